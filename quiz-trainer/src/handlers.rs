//! One routine per shell command.
//!
//! Handlers validate their argument, run a store operation and write the
//! response. They return [`QuizError`]s through [`SessionError::Quiz`] and
//! leave reporting and the next prompt to [`Session::run`].

use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::command::{complete, parse_id, Command, VOCABULARY};
use crate::error::{QuizError, SessionError};
use crate::game::{Finish, Game, Verdict};
use crate::model::Quiz;
use crate::output::Color;
use crate::session::{Flow, Session};

pub const AUTHOR: &str = "MARTIN";

const HELP: &[&str] = &[
    "Commands:",
    "   h|help - Show this help.",
    "   list - List the existing quizzes.",
    "   show <id> - Show the question and the answer of the given quiz.",
    "   add - Add a new quiz interactively.",
    "   delete <id> - Delete the given quiz.",
    "   edit <id> - Edit the given quiz.",
    "   test <id> - Try to answer the given quiz.",
    "   p|play - Answer every quiz in random order.",
    "   credits - Credits.",
    "   q|quit - Leave the quiz.",
];

pub async fn dispatch<R, W>(session: &mut Session<R, W>, command: Command) -> Result<Flow, SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    match command {
        Command::Help => help(session).await?,
        Command::List => list(session).await?,
        Command::Show(arg) => show(session, arg.as_deref()).await?,
        Command::Add => add(session).await?,
        Command::Delete(arg) => delete(session, arg.as_deref()).await?,
        Command::Edit(arg) => edit(session, arg.as_deref()).await?,
        Command::Test(arg) => test(session, arg.as_deref()).await?,
        Command::Play => play(session).await?,
        Command::Credits => credits(session).await?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

pub async fn help<R, W>(session: &mut Session<R, W>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    for line in HELP {
        session.output().line(line).await?;
    }
    Ok(())
}

pub async fn list<R, W>(session: &mut Session<R, W>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let quizzes = session.store().list_all().await?;
    for quiz in quizzes {
        let output = session.output();
        let line = format!(
            "[{}]: {}",
            output.paint(&quiz.id.to_string(), Color::Magenta),
            quiz.question
        );
        output.line(&line).await?;
    }
    Ok(())
}

pub async fn show<R, W>(session: &mut Session<R, W>, arg: Option<&str>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let quiz = lookup(session, arg).await?;
    let line = describe(session, &quiz);
    session.output().line(&line).await?;
    Ok(())
}

pub async fn add<R, W>(session: &mut Session<R, W>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let question = ask(session, " Enter a question: ").await?;
    let answer = ask(session, " Enter the answer: ").await?;

    let quiz = session.store().create(&question, &answer).await?;
    let line = format!(
        " {}: {}",
        session.paint("Added", Color::Magenta),
        describe(session, &quiz)
    );
    session.output().line(&line).await?;
    Ok(())
}

pub async fn delete<R, W>(session: &mut Session<R, W>, arg: Option<&str>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let id = parse_id(arg)?;
    if !session.store().delete_by_id(id).await? {
        return Err(QuizError::NotFound(id).into());
    }

    let output = session.output();
    let line = format!("Deleted quiz [{}]", output.paint(&id.to_string(), Color::Magenta));
    output.line(&line).await?;
    Ok(())
}

/// Asks for both fields again, showing the current values. An empty reply
/// keeps the current value.
pub async fn edit<R, W>(session: &mut Session<R, W>, arg: Option<&str>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let quiz = lookup(session, arg).await?;

    let question = ask(session, &format!(" Enter a question [{}]: ", quiz.question)).await?;
    let question = if question.is_empty() { quiz.question } else { question };
    let answer = ask(session, &format!(" Enter the answer [{}]: ", quiz.answer)).await?;
    let answer = if answer.is_empty() { quiz.answer } else { answer };

    let updated = session.store().update(quiz.id, &question, &answer).await?;
    let line = format!(
        "Quiz {} changed to: {}",
        session.paint(&updated.id.to_string(), Color::Magenta),
        describe(session, &updated)
    );
    session.output().line(&line).await?;
    Ok(())
}

pub async fn test<R, W>(session: &mut Session<R, W>, arg: Option<&str>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let quiz = lookup(session, arg).await?;
    let reply = ask_question(session, &quiz).await?;

    let output = session.output();
    output.line("Your answer is").await?;
    if quiz.is_correct(&reply) {
        output.colored("CORRECT", Color::Green).await?;
    } else {
        output.colored("INCORRECT", Color::Red).await?;
    }
    Ok(())
}

/// Asks every quiz in random order until one is answered wrong.
pub async fn play<R, W>(session: &mut Session<R, W>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut game = Game::new(session.store().list_all().await?);

    while let Some(quiz) = game.next_question(session.rng()).cloned() {
        let reply = ask_question(session, &quiz).await?;
        match game.submit(&reply) {
            Verdict::Correct { score } => {
                let line = format!("CORRECT - {score} right so far");
                session.output().colored(&line, Color::Green).await?;
            }
            Verdict::Incorrect { .. } => {
                session.output().colored("INCORRECT.", Color::Red).await?;
            }
        }
    }

    if game.finish() == Some(Finish::Exhausted) {
        session.output().line("No more questions.").await?;
    }
    final_score(session, game.score()).await
}

pub async fn credits<R, W>(session: &mut Session<R, W>) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let output = session.output();
    output.line("Credits:").await?;
    output.colored(AUTHOR, Color::Green).await?;
    Ok(())
}

/// Reply to a first word that is not a command.
pub async fn unknown<R, W>(session: &mut Session<R, W>, token: &str) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let output = session.output();
    let line = format!("unknown command: '{}'", output.paint(token, Color::Red));
    output.line(&line).await?;

    let suggestions = complete(token);
    if suggestions.len() < VOCABULARY.len() {
        output
            .line(&format!("did you mean: {}?", suggestions.join(", ")))
            .await?;
    }

    let line = format!(
        "Use {} to see all available commands",
        output.paint("help", Color::Green)
    );
    output.line(&line).await?;
    Ok(())
}

async fn lookup<R, W>(session: &mut Session<R, W>, arg: Option<&str>) -> Result<Quiz, SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let id = parse_id(arg)?;
    match session.store().get_by_id(id).await? {
        Some(quiz) => Ok(quiz),
        None => Err(QuizError::NotFound(id).into()),
    }
}

async fn ask<R, W>(session: &mut Session<R, W>, prompt: &str) -> Result<String, SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let prompt = session.paint(prompt, Color::Red);
    Ok(session.ask(&prompt).await?.trim().to_string())
}

async fn ask_question<R, W>(session: &mut Session<R, W>, quiz: &Quiz) -> Result<String, SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let prompt = format!("{}\n", session.paint(&quiz.question, Color::Red));
    session.ask(&prompt).await
}

async fn final_score<R, W>(session: &mut Session<R, W>, score: usize) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let output = session.output();
    let line = format!(
        "End of quiz. Score: {}",
        output.paint(&score.to_string(), Color::Magenta)
    );
    output.line(&line).await?;
    Ok(())
}

fn describe<R, W>(session: &Session<R, W>, quiz: &Quiz) -> String
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    format!(
        "[{}]: {} {} {}",
        session.paint(&quiz.id.to_string(), Color::Magenta),
        quiz.question,
        session.paint("=>", Color::Magenta),
        quiz.answer
    )
}
