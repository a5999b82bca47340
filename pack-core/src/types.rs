/// Identifier for a placed circle in a [`crate::packer::Packer`].
///
/// This is an index into the packer's circle list, and is only meaningful
/// within the lifetime of a given packing. Circles are append-only, so an
/// id stays valid once handed out.
pub type CircleId = usize;

/// Unordered pair of placed circles, always stored as `(lower, higher)`.
pub type CirclePair = (CircleId, CircleId);
