/// Page size used when the request gives none (or a non-numeric one).
pub const DEFAULT_LIMIT: usize = 12;

/// Largest page size a client may request.
pub const MAX_LIMIT: usize = 100;
