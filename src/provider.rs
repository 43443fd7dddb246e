//! Provider-facing request policy: endpoints, headers, credential placement, and error checks.
//!
//! `policy` defines [`ProviderPolicy`], the fixed capability interface the client engine
//! consults for every call, together with the plain-data [`TokenRequest`] it customizes.
//! `flexmls` implements the policy for the FlexMLS / Spark Platform identity provider.

pub mod flexmls;
pub mod policy;

pub use flexmls::*;
pub use policy::*;
