//! Clients for the external capabilities the core consumes: variant
//! catalog lookup and the customer directory. Both are traits so tests
//! can substitute stubs; production uses the HTTP implementations backed
//! by the storefront platform API.

pub mod catalog;
pub mod directory;
