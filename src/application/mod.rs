pub mod use_cases;

pub use use_cases::testcase_generation::TestCaseGenerationUseCase;
