/// Identifier for a charge in a [`crate::charge::ChargeSet`].
///
/// This is an index into `ChargeSet::points`, and is only meaningful within
/// the lifetime of a given `ChargeSet` instance.
pub type ChargeId = usize;
