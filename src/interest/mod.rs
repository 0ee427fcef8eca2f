pub mod insights;
pub mod log;
pub mod query;
pub mod tags;
pub mod types;

pub use insights::{get_insights, InsightsReport};
pub use log::{
    get_current, get_interest, get_trajectory, mark_explored, mark_interesting, prune, resolve,
    update_with_discoveries,
};
pub use query::{list_interests, search};
pub use tags::{add_tags, get_tags, refresh_tag_salience, tag_cloud};
pub use types::{Discoveries, Interest, InterestFilter, InterestTag, InterestType, NewInterest};
