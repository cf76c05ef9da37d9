/// Image handling module
///
/// This module handles:
/// - Rejecting oversized uploads
/// - Downscaling and re-encoding uploads as JPEG
/// - Packing and unpacking data URL payloads

pub mod normalize;
