pub mod movie;
pub mod quiz;
pub mod session;

pub use movie::{
    CastMember, CatalogMovie, CreditList, DiscoverPage, MovieDetails, Recommendation, Video,
    VideoList,
};
pub use quiz::{QuizAnswer, TasteCategory, TasteProfile, PRIORITY_ORDER};
pub use session::SessionRecord;
