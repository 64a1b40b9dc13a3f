// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent platform resource ID confusion at compile time.

mod app_name;
mod id;

pub use app_name::{AppName, AppNameError};
pub use id::{
    AppId, AppMarker, BuildId, BuildMarker, DomainId, DomainMarker, DropletId, DropletMarker, Id,
    PackageId, PackageMarker, RouteId, RouteMarker, SpaceId, SpaceMarker,
};
