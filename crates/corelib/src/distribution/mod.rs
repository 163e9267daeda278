//! Distribution algorithms over a network's membership.
//!
//! Both resources follow the same shape: snapshot the eligible members,
//! order them, walk greedily, let each member's own accept/yield amount be
//! authoritative. The walks differ in ordering policy:
//!
//! - **Energy push**: fill the lowest fill-ratio first (approximates
//!   equalizing percentage-fill, not absolute quantity)
//! - **Energy pull**: drain the highest fill-ratio first
//! - **Items**: shuffled order, so repeated sends don't always favor the
//!   same member
//!
//! No walk is transactional: each member transfer commits independently, and
//! two concurrent walks over overlapping members may both partially succeed
//! against the same member. That relaxed consistency is a documented
//! tradeoff, not a bug.

pub mod energy;
pub mod items;
