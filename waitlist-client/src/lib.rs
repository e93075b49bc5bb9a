//! Admin client for the waitlist backend
//!
//! Two components make up the admin panel core:
//! - [`SessionManager`] acquires, stores, attaches and drops the admin
//!   bearer credential.
//! - [`UserPager`] browses the administered users one page at a time.
//!
//! Both talk to the backend through the [`Transport`] trait; [`HttpTransport`]
//! is the reqwest implementation.

pub mod error;
pub mod pager;
pub mod session;
pub mod store;
pub mod transport;
pub mod waitlist;

#[cfg(test)]
mod testing;

pub use error::{ClientError, Notice, NoticeLevel, Result};
pub use pager::{AggregateCount, PageState, PageWindow, UserPager};
pub use session::{SessionGate, SessionManager};
pub use store::{Credential, CredentialStore, FileStore, MemoryStore, StoreError};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport, TransportError};
pub use waitlist::WaitlistClient;
pub use waitlist_common::auth::AdminIdentity;
pub use waitlist_common::users::AdminUser;
