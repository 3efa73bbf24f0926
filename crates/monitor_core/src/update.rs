use crate::{Effect, MonitorState, Msg, SessionPhase, Severity, StartAck};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: MonitorState, msg: Msg) -> (MonitorState, Vec<Effect>) {
    let effects = match msg {
        Msg::SubmitClicked(form) => {
            if state.submission_in_flight() {
                return (state, Vec::new());
            }
            match form.validate() {
                Ok(params) => {
                    state.begin_submission();
                    vec![Effect::SubmitJob(params)]
                }
                Err(err) => {
                    let message = err.to_string();
                    state.reject_input(err);
                    vec![Effect::Notify {
                        severity: Severity::Error,
                        message,
                    }]
                }
            }
        }
        Msg::StartAcknowledged(StartAck::Started) => {
            state.accept_submission();
            let mut effects = vec![Effect::Notify {
                severity: Severity::Info,
                message: "Processing started".to_string(),
            }];
            // A second acceptance while a session is live must not start another one.
            if state.phase() != SessionPhase::Polling {
                state.start_session();
                effects.push(Effect::StartPolling);
            }
            effects
        }
        Msg::StartAcknowledged(StartAck::Rejected(reason))
        | Msg::StartAcknowledged(StartAck::Failed(reason)) => {
            state.fail_submission(reason);
            Vec::new()
        }
        Msg::ProgressSampled(snapshot) => {
            if state.phase() != SessionPhase::Idle {
                state.apply_progress(snapshot);
            }
            Vec::new()
        }
        Msg::LogsSampled(transcript) => {
            if state.phase() != SessionPhase::Idle {
                state.resync_log(&transcript);
            }
            Vec::new()
        }
        Msg::CompletionChecked(snapshot) => {
            if state.phase() != SessionPhase::Polling {
                return (state, Vec::new());
            }
            match snapshot.running {
                Some(false) => {
                    state.mark_done();
                    vec![Effect::StopPolling, Effect::FetchResult]
                }
                Some(true) => Vec::new(),
                None => {
                    state.record_inconclusive_check();
                    Vec::new()
                }
            }
        }
        Msg::CompletionCheckFailed(_reason) => {
            if state.phase() == SessionPhase::Polling {
                state.record_inconclusive_check();
            }
            Vec::new()
        }
        Msg::ResultFetched(outcome) => {
            if state.phase() != SessionPhase::Retrieving {
                return (state, Vec::new());
            }
            match outcome {
                Ok(artifact) => {
                    state.store_result(artifact);
                    vec![Effect::Notify {
                        severity: Severity::Info,
                        message: "Result retrieved".to_string(),
                    }]
                }
                Err(detail) => {
                    state.result_unavailable(detail);
                    vec![Effect::Notify {
                        severity: Severity::Warning,
                        message: "Failed to fetch result".to_string(),
                    }]
                }
            }
        }
    };

    (state, effects)
}
