pub mod mastery;
pub mod session;
pub mod test_gen;
pub mod word;

pub use mastery::{MasteryLevel, VocabMastery};
pub use session::{VocabEngine, VocabMode, VocabReport, VocabResponse, VocabSession};
pub use test_gen::{VocabTestQuestion, VocabTestType, build_test_question};
pub use word::VocabularyWord;
