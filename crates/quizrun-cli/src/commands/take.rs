//! The `quizrun take` command and the interactive session driver.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use quizrun_core::scoring::QuizOutcome;
use quizrun_core::{Phase, QuizSession, QuizSessionController, SessionError};

use super::{connect, explain};

pub async fn execute(
    quiz_id: i64,
    results_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, controller) = connect(config_path)?;
    let session = controller.open(quiz_id).await;
    let results_dir = results_dir.or(config.results_dir);
    drive(&controller, session, results_dir.as_deref()).await
}

/// Run a session on stdin/stdout and save the outcome if asked to.
pub(crate) async fn drive(
    controller: &QuizSessionController,
    session: QuizSession,
    results_dir: Option<&Path>,
) -> Result<()> {
    let stdin = std::io::stdin();
    let outcome = run_session(controller, session, stdin.lock(), std::io::stdout()).await?;

    if let (Some(outcome), Some(dir)) = (outcome, results_dir) {
        let path = dir.join(outcome.file_name());
        outcome.save_json(&path)?;
        eprintln!("Result saved to: {}", path.display());
    }
    Ok(())
}

/// A line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Choose the n-th displayed option (0-based).
    Choose(usize),
    Next,
    Previous,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "n" | "next" | "f" | "finish" => Some(Command::Next),
        "p" | "prev" | "previous" => Some(Command::Previous),
        "q" | "quit" => Some(Command::Quit),
        "a" | "b" | "c" | "d" => Some(Command::Choose((line.as_bytes()[0] - b'a') as usize)),
        _ => line
            .parse::<usize>()
            .ok()
            .filter(|&n| n >= 1)
            .map(|n| Command::Choose(n - 1)),
    }
}

fn render_question<W: Write>(session: &QuizSession, out: &mut W) -> Result<()> {
    let Some(question) = session.current_question() else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(
        out,
        "{} ({}%)",
        session.progress_label(),
        session.progress_percent().unwrap_or(0)
    )?;
    writeln!(out, "{}", question.question_title)?;
    let selected = session.selected_answer();
    for (i, option) in question.presentable_options().iter().enumerate() {
        let marker = if selected == Some(option.slot) { '*' } else { ' ' };
        writeln!(out, " {marker} {}. {}", (b'A' + i as u8) as char, option.text)?;
    }

    let next = if session.is_last_question() {
        "n finish quiz"
    } else {
        "n next"
    };
    let mut hints = vec!["letter to choose"];
    if session.can_advance() {
        hints.push(next);
    }
    if session.can_retreat() {
        hints.push("p previous");
    }
    hints.push("q quit");
    write!(out, "[{}] > ", hints.join(", "))?;
    out.flush()?;
    Ok(())
}

fn render_outcome<W: Write>(outcome: &QuizOutcome, out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Quiz completed!")?;
    writeln!(
        out,
        "Score: {} out of {}",
        outcome.score, outcome.total_questions
    )?;
    if let Some(pct) = outcome.percentage {
        writeln!(out, "Success rate: {pct}%")?;
    }
    if let Some(tier) = outcome.tier {
        writeln!(out, "{}", tier.message())?;
    }
    writeln!(out, "Retake with: quizrun take --quiz-id {}", outcome.quiz_id)?;
    Ok(())
}

fn describe(err: SessionError) -> &'static str {
    match err {
        SessionError::NoAnswerRecorded => "Choose an answer first.",
        SessionError::AtFirstQuestion => "Already at the first question.",
        SessionError::InvalidOption(_) => "No such option.",
        SessionError::SubmissionInProgress => "Already submitting.",
        SessionError::NotActive => "The quiz is no longer active.",
    }
}

/// Drive a session from `input`, writing the UI to `out`.
///
/// Returns the outcome when the quiz was submitted and scored, `None` when
/// the user quit or the quiz has no questions.
pub(crate) async fn run_session<R: BufRead, W: Write>(
    controller: &QuizSessionController,
    mut session: QuizSession,
    mut input: R,
    mut out: W,
) -> Result<Option<QuizOutcome>> {
    match session.phase() {
        Phase::Failed(err) => return Err(explain(err.clone()).context("failed to load quiz")),
        Phase::Empty => {
            writeln!(out, "No questions found for this quiz.")?;
            return Ok(None);
        }
        _ => {}
    }

    let mut line = String::new();
    while session.phase() == &Phase::Active {
        render_question(&session, &mut out)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            writeln!(out, "Quiz abandoned.")?;
            return Ok(None);
        }

        let Some(command) = parse_command(&line) else {
            writeln!(out, "Unrecognised input: {}", line.trim())?;
            continue;
        };

        let outcome = match command {
            Command::Choose(index) => {
                let slot = session
                    .current_question()
                    .and_then(|q| q.presentable_options().get(index).map(|o| o.slot));
                match slot {
                    Some(slot) => session.select_answer(slot),
                    None => Err(SessionError::InvalidOption(index)),
                }
            }
            Command::Next => {
                if session.is_last_question() && session.can_advance() {
                    writeln!(out, "Submitting...")?;
                }
                controller.advance(&mut session).await.map(|_| ())
            }
            Command::Previous => session.retreat().map(|_| ()),
            Command::Quit => {
                writeln!(out, "Quiz abandoned.")?;
                return Ok(None);
            }
        };
        if let Err(e) = outcome {
            writeln!(out, "{}", describe(e))?;
        }
    }

    match session.phase() {
        Phase::Completed(result) => {
            let outcome = QuizOutcome::new(session.quiz_id(), session.attempt_id(), *result);
            render_outcome(&outcome, &mut out)?;
            Ok(Some(outcome))
        }
        Phase::Failed(err) => Err(explain(err.clone()).context("failed to submit quiz")),
        other => anyhow::bail!("session ended in unexpected state: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::sync::Arc;

    use quizrun_client::mock::MockQuizService;
    use quizrun_client::StaticCredentials;
    use quizrun_core::model::QuestionRecord;
    use quizrun_core::scoring::Tier;
    use quizrun_core::traits::Role;
    use quizrun_core::ServiceError;

    fn questions() -> Vec<QuestionRecord> {
        vec![
            QuestionRecord {
                id: 1,
                question_title: "Capital of France?".into(),
                option1: Some("Paris".into()),
                option2: Some("London".into()),
                option3: None,
                option4: None,
            },
            QuestionRecord {
                id: 2,
                question_title: "Largest ocean?".into(),
                option1: Some(" ".into()),
                option2: Some("Atlantic".into()),
                option3: Some("Pacific".into()),
                option4: None,
            },
        ]
    }

    fn controller(mock: Arc<MockQuizService>) -> QuizSessionController {
        QuizSessionController::new(
            mock,
            Arc::new(StaticCredentials::new(Some("t".into()), Role::Student)),
        )
    }

    async fn run(
        mock: Arc<MockQuizService>,
        script: &str,
    ) -> (Result<Option<QuizOutcome>>, String) {
        let ctl = controller(mock);
        let session = ctl.open(1).await;
        let mut out = Vec::new();
        let result = run_session(&ctl, session, Cursor::new(script.to_string()), &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("A\n"), Some(Command::Choose(0)));
        assert_eq!(parse_command(" d "), Some(Command::Choose(3)));
        assert_eq!(parse_command("2"), Some(Command::Choose(1)));
        assert_eq!(parse_command("next"), Some(Command::Next));
        assert_eq!(parse_command("P"), Some(Command::Previous));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("0"), None);
        assert_eq!(parse_command("zebra"), None);
        assert_eq!(parse_command(""), None);
    }

    #[tokio::test]
    async fn letters_map_to_displayed_options_not_raw_slots() {
        let mock = Arc::new(MockQuizService::new("2").with_quiz(1, "Mixed", questions()));
        // Second question displays Atlantic as A and Pacific as B.
        let (result, out) = run(mock.clone(), "a\nn\nb\nn\n").await;

        let outcome = result.unwrap().unwrap();
        assert_eq!(outcome.tier, Some(Tier::Perfect));
        assert!(!outcome.attempt_id.is_nil());
        assert!(out.contains("Question 2 of 2"));
        assert!(out.contains("Score: 2 out of 2"));
        assert!(out.contains("Retake with: quizrun take --quiz-id 1"));

        let (_, responses) = &mock.submissions()[0];
        assert_eq!(responses[0].response, "Paris");
        assert_eq!(responses[1].response, "Pacific");
    }

    #[tokio::test]
    async fn next_without_answer_is_refused() {
        let mock = Arc::new(MockQuizService::new("0").with_quiz(1, "Mixed", questions()));
        let (result, out) = run(mock.clone(), "n\np\nq\n").await;

        assert!(result.unwrap().is_none());
        assert!(out.contains("Choose an answer first."));
        assert!(out.contains("Already at the first question."));
        assert!(out.contains("Quiz abandoned."));
        assert!(mock.submissions().is_empty());
    }

    #[tokio::test]
    async fn end_of_input_abandons_the_quiz() {
        let mock = Arc::new(MockQuizService::new("0").with_quiz(1, "Mixed", questions()));
        let (result, out) = run(mock, "a\n").await;
        assert!(result.unwrap().is_none());
        assert!(out.contains("Quiz abandoned."));
    }

    #[tokio::test]
    async fn out_of_range_choice_is_reported() {
        let mock = Arc::new(MockQuizService::new("0").with_quiz(1, "Mixed", questions()));
        let (_, out) = run(mock, "c\nq\n").await;
        assert!(out.contains("No such option."));
    }

    #[tokio::test]
    async fn empty_quiz_reports_no_questions() {
        let mock = Arc::new(MockQuizService::new("0").with_quiz(1, "Empty", vec![]));
        let (result, out) = run(mock, "").await;
        assert!(result.unwrap().is_none());
        assert!(out.contains("No questions found for this quiz."));
    }

    #[tokio::test]
    async fn submission_failure_is_an_error() {
        let mock = Arc::new(
            MockQuizService::new("0")
                .with_quiz(1, "Mixed", questions())
                .with_submit_error(ServiceError::Timeout(30)),
        );
        let (result, _) = run(mock, "a\nn\na\nn\n").await;
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("failed to submit quiz"));
    }

    #[tokio::test]
    async fn missing_quiz_is_a_load_error() {
        let mock = Arc::new(MockQuizService::new("0"));
        let (result, _) = run(mock, "").await;
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("failed to load quiz"));
    }
}
