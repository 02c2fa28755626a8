pub use self::{
    chord::ChordEvaluator, jack::JackEvaluator, stream::StreamEvaluator,
    technical::TechnicalEvaluator,
};

mod chord;
mod jack;
mod stream;
mod technical;
