pub mod data;
pub mod drag;
pub mod export;
pub mod line;
pub mod parse;
pub mod registry;
pub mod station;
pub mod transcript;
pub mod view;

pub use drag::DragHandler;
pub use export::export_stations;
pub use line::{LineId, LineInfo, LineKind, LineTable, Rgb};
pub use parse::{parse_stations, ParseError};
pub use registry::{Registry, RegistryError};
pub use station::{LatLng, Station};
pub use transcript::{ChatMessage, ChatRequest, ChatSession, Reply, Role};
pub use view::LinePath;
