pub mod db;
pub mod openai_humanizer;
pub mod sim_humanizer;

pub use db::DbStorage;
pub use openai_humanizer::OpenAiHumanizer;
pub use sim_humanizer::SimulatedHumanizer;
