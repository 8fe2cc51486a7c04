mod activity;
mod context;
mod preferences;
mod recommendation;

pub use activity::{
    ActivityItem, Candidate, Category, Coordinates, IndoorOutdoor, LocaleHints, PriceLevel,
    SourceKind, TravelTimes,
};
pub use context::{Context, ContextOverride, Weather, WeatherCondition};
pub use preferences::{Preferences, Theme, TimeBucket};
pub use recommendation::{PipelineMeta, RecommendationSet, SourceCounts};
