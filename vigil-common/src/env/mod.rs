pub mod block_id;
pub mod heartbeat;
pub mod proposal;
pub mod vote;

pub use block_id::{BlockId, PartSetHeader};
pub use heartbeat::Heartbeat;
pub use proposal::Proposal;
pub use vote::{SignedVoteReply, Vote, VoteType};
