// HTTP access layer: thin typed wrappers over the backend REST endpoints.
// No retry, no caching; failures are logged and propagated to the caller.

mod client;
mod parameters;
mod results;
mod scene;
mod system;

pub use client::ApiClient;
