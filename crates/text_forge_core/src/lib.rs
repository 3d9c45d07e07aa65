pub mod domain;
pub mod ports;

pub use domain::{
    AiDetection, ConversionOptions, ConvertedFile, FileOperation, HumanizationOptions,
    HumanizeLevel, HumanizeOutcome, HumanizeStyle, HumanizedText, NewConvertedFile,
    NewHumanizedText, PlagiarismScore, User,
};
pub use ports::{HumanizerService, PortError, PortResult, StorageService};
