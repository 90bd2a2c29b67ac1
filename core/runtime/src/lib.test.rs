use super::*;

#[test]
fn exec_result_success_requires_zero_exit_and_no_interruption() {
    let ok = ExecResult { output: String::new(), exit_code: Some(0), truncated: false, full_output_ref: None, aborted: false, timed_out: false };
    assert!(ok.success());

    let nonzero = ExecResult { exit_code: Some(1), ..ok.clone() };
    assert!(!nonzero.success());

    let aborted = ExecResult { aborted: true, ..ok.clone() };
    assert!(!aborted.success());

    let timed_out = ExecResult { timed_out: true, ..ok };
    assert!(!timed_out.success());
}
