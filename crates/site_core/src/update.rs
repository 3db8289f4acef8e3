use crate::{CrawlSession, Effect, Msg, SessionStatus};

/// Pure update function: applies a message to the session and returns the effects
/// the runner must perform next.
///
/// The runner answers `Effect::Fetch` with `PageFetched`/`PageFailed` and
/// `Effect::Delay` with `DelayElapsed`. Messages that do not fit the current
/// status are ignored.
pub fn update(mut session: CrawlSession, msg: Msg) -> (CrawlSession, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if session.status() != SessionStatus::Idle {
                return (session, Vec::new());
            }
            session.start();
            vec![pump(&mut session)]
        }
        Msg::PageFetched(page) => match session.take_in_flight() {
            Some(_) if session.status() == SessionStatus::Running => {
                session.record_page(*page);
                vec![Effect::Delay]
            }
            _ => Vec::new(),
        },
        Msg::PageFailed { reason: _ } => match session.take_in_flight() {
            Some(_) if session.status() == SessionStatus::Running => {
                session.record_failure();
                vec![Effect::Delay]
            }
            _ => Vec::new(),
        },
        Msg::DelayElapsed => {
            if session.status() == SessionStatus::Running && session.in_flight().is_none() {
                vec![pump(&mut session)]
            } else {
                Vec::new()
            }
        }
    };

    (session, effects)
}

fn pump(session: &mut CrawlSession) -> Effect {
    match session.next_fetch() {
        Some(url) => Effect::Fetch { url },
        None => {
            session.finish();
            Effect::Finished
        }
    }
}
