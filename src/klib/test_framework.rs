//! Framework de testes do kernel
//!
//! Suites rodam dentro do kernel (sem `std`), reportando cada caso pelos
//! macros de log.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Totais de uma suite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Executa suite de testes
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("=== Executando suite:");
    crate::kinfo!(name);

    let mut report = SuiteReport::default();

    for test in tests {
        match (test.func)() {
            TestResult::Passed => {
                crate::kok!(test.name);
                report.passed += 1;
            }
            TestResult::Failed => {
                crate::kfail!(test.name);
                report.failed += 1;
            }
            TestResult::Skipped => {
                crate::kwarn!(test.name);
                report.skipped += 1;
            }
        }
    }

    crate::kinfo!("Resultados: passed=", report.passed);
    if report.failed > 0 {
        crate::kerror!("Resultados: failed=", report.failed);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass() -> TestResult {
        TestResult::Passed
    }

    fn fail() -> TestResult {
        TestResult::Failed
    }

    fn skip() -> TestResult {
        TestResult::Skipped
    }

    #[test]
    fn test_suite_counts_results() {
        let cases = [
            TestCase::new("a", pass),
            TestCase::new("b", fail),
            TestCase::new("c", pass),
            TestCase::new("d", skip),
        ];
        let report = run_test_suite("mixed", &cases);
        assert_eq!(
            report,
            SuiteReport {
                passed: 2,
                failed: 1,
                skipped: 1
            }
        );
    }
}
