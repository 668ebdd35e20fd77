//! Host editor adapters.
//!
//! Input-method frameworks implement [`HostEditor`](crate::application::host::HostEditor)
//! on their own input-context type.  The recording double lives here.

pub mod mock;
