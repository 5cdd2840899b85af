//! Domain model shared by every `cbhunt` crate.
//!
//! Holds the mission configurations, the structured findings the extraction
//! pipeline produces (cases, trends, IP profiles, match recommendations), the
//! collection record persisted by the store, and application configuration.

pub mod app_config;
pub mod case;
pub mod collection;
pub mod config;
pub mod dates;
pub mod error;
pub mod ip_profile;
pub mod matchmaking;
pub mod mission;
pub mod provenance;
pub mod quick_picks;
pub mod trend;

pub use app_config::{AppConfig, Environment};
pub use case::{sort_cases_by_date_desc, Case, Right};
pub use collection::{Collection, CollectionKind};
pub use config::{load_app_config, load_app_config_from_env};
pub use dates::{parse_loose_date, year_month_key};
pub use error::{ConfigError, MissionConfigError};
pub use ip_profile::{
    CollabEntry, CommercialAnalysis, CoreAudience, CurrentStatus, DesignElements, IpMeta,
    IpProfile, StrategicFit, Tier, TimelineEvent,
};
pub use matchmaking::{BudgetLevel, MatchRecommendation};
pub use mission::{
    BrandSearchConfig, MatchConfig, MissionConfig, MissionKind, ScoutConfig, TrendConfig,
};
pub use provenance::{GroundingChunk, GroundingMetadata, WebSource};
pub use quick_picks::{load_quick_picks, QuickPick, QuickPickCategory, QuickPicksFile};
pub use trend::{CommercialValue, Momentum, TrendItem};
