pub mod conversations;
pub mod daily_picks;
pub mod interests;
pub mod likes;
pub mod users;

pub use conversations::{Conversation, ConversationSummary, LastMessage, Message, Participant, SentMessage};
pub use daily_picks::{RefreshOutcome, ScoredCandidate, ScoredPick};
pub use interests::{Interest, InterestSet};
pub use likes::{AffinityOutcome, Liker, MatchedUser};
pub use users::{NewUser, User, UserProfile, UserSummary, UserUpdate};
