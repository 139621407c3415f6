use gild_core::Status;

use crate::runner::SuiteReport;

/// Plain-text suite summary for the terminal.
pub fn format_report(report: &SuiteReport) -> String {
    let mut s = String::new();
    s.push_str(&format!("suite: {}\n", report.suite.display()));
    s.push_str(&format!("run: {}\n\n", report.run_id));

    for case in &report.cases {
        match &case.error {
            Some(err) => s.push_str(&format!("{} {}: {}\n", Status::Error.symbol(), case.name, err)),
            None => s.push_str(&format!("{} {}\n", case.status().symbol(), case.name)),
        }
        for r in &case.results {
            s.push_str(&format!("    {} {}\n", r.status.symbol(), r.name));
            if r.status != Status::Pass {
                for line in r.message.lines() {
                    s.push_str(&format!("        {line}\n"));
                }
            }
        }
    }

    let (passed, failed, errored) = report.counts();
    s.push('\n');
    s.push_str(&format!(
        "{} test cases: {passed} passed, {failed} failed, {errored} errored\n",
        report.cases.len()
    ));
    if report.kept {
        s.push_str(&format!("run directory: {}\n", report.run_dir.display()));
    }
    s
}
