// Wire envelope and realtime message payloads
pub mod message;

// REST data-transfer shapes
pub mod model;

// HTTP access layer
pub mod api;

// Realtime connection management
pub mod connection;

// Configuration
pub mod config;
