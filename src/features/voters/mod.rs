//! Voter management: listing with client-side filtering, upload-task status and
//! bulk voter-file uploads. Every call is authenticated with the stored bearer
//! token; a 401 from these endpoints means the session has expired.

pub mod client;
pub mod table;
pub mod types;
pub mod upload;
