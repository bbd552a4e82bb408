//! OAuth sessions and vendor API access for Spotify and YouTube

pub mod provider;
pub mod proxy;
pub mod session;

pub use provider::{OAuthProvider, ProviderKind};
pub use proxy::{Credential, VendorRequest};
pub use session::{Session, SessionCookies, SessionState, TokenSet, EXPIRY_BUFFER_MS};
