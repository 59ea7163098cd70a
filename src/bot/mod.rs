//! Telegram bot module - log workouts by chatting

use std::sync::Arc;

use teloxide::{
    dispatching::dialogue::{Dialogue, InMemStorage},
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
    utils::command::BotCommands,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::chat::{self, SAVED};
use crate::db::{BoxedStore, WorkoutStore, open_store};
use crate::progress::{OneRepMaxTrend, ProgressMetrics, exercise_progress};
use crate::split::{Planner, classify, suggest_from_history};
use crate::workout::Workout;

type MyDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type SharedDb = Arc<Mutex<BoxedStore>>;

const SAVE_CALLBACK: &str = "save";
const DISCARD_CALLBACK: &str = "discard";

/// How many workouts /history shows
const HISTORY_LIMIT: usize = 5;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    /// Parsed workout waiting for the user to confirm saving
    PendingSave { workout: Workout },
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "Start")]
    Start,
    #[command(description = "Show help")]
    Help,
    #[command(description = "Recent workouts")]
    History,
    #[command(description = "Suggest the next workout")]
    Next,
    #[command(description = "Progress for an exercise, e.g. /progress Squat")]
    Progress(String),
}

fn make_save_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("💾 Save workout", SAVE_CALLBACK),
        InlineKeyboardButton::callback("✖ Discard", DISCARD_CALLBACK),
    ]])
}

fn user_id(chat_id: ChatId) -> String {
    chat_id.0.to_string()
}

/// Start the Telegram bot
pub async fn run_bot(token: String, db_path: &str, planner: Planner) -> anyhow::Result<()> {
    let bot = Bot::new(token);
    let db: SharedDb = Arc::new(Mutex::new(open_store(db_path)?));

    info!("Bot starting with database {}", db_path);

    let handler = dptree::entry()
        .enter_dialogue::<Update, InMemStorage<State>, State>()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<State>::new(), db, planner])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    db: SharedDb,
    planner: Planner,
) -> HandlerResult {
    let user = user_id(msg.chat.id);

    match cmd {
        Command::Start => {
            let text = format!(
                "🏋️ repchat\n\n{}\n\n\
                /history - recent workouts\n\
                /next - what to train next\n\
                /progress <exercise> - progress for an exercise",
                chat::GREETING
            );
            bot.send_message(msg.chat.id, text).await?;
        }

        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }

        Command::History => {
            let records = db.lock().await.list(&user)?;

            if records.is_empty() {
                bot.send_message(msg.chat.id, "No workouts yet. Tell me what you did!")
                    .await?;
            } else {
                let mut text = String::from("📊 Recent workouts:\n");
                for record in records.iter().take(HISTORY_LIMIT) {
                    let badge = classify(&record.workout)
                        .map(|s| format!("{} {}", s.emoji(), s))
                        .unwrap_or_else(|| "•".to_string());
                    text.push_str(&format!(
                        "\n{} {} (#{})\n{}\n",
                        badge,
                        record.date.format("%b %-d, %Y"),
                        record.id,
                        chat::format_workout(&record.workout)
                    ));
                }
                bot.send_message(msg.chat.id, text).await?;
            }
        }

        Command::Next => {
            let records = db.lock().await.list(&user)?;
            let workouts: Vec<Workout> = records.into_iter().map(|r| r.workout).collect();

            let text = match suggest_from_history(&planner, &workouts) {
                Some(next) => format!("Next up: {} {} day", next.emoji(), next),
                None => "Log a couple more workouts and I'll suggest what's next.".to_string(),
            };
            bot.send_message(msg.chat.id, text).await?;
        }

        Command::Progress(exercise) => {
            let exercise = exercise.trim();
            if exercise.is_empty() {
                bot.send_message(msg.chat.id, "Usage: /progress <exercise>").await?;
                return Ok(());
            }

            let records = db.lock().await.list(&user)?;
            let points = exercise_progress(&records, exercise);

            let text = if points.is_empty() {
                format!("No sessions of {} yet.", exercise)
            } else {
                let mut lines = vec![format!("📈 {}", exercise)];
                for point in &points {
                    lines.push(format!(
                        "{}: est. 1RM {:.1}",
                        point.date.format("%b %-d"),
                        point.estimated_one_rep_max
                    ));
                }
                if let Some(metrics) = ProgressMetrics::from_points(&points) {
                    lines.push(String::new());
                    lines.push(metrics.format());
                }
                if let Some(trend) = OneRepMaxTrend::train(&points) {
                    lines.push(String::new());
                    lines.push(trend.format());
                }
                lines.join("\n")
            };
            bot.send_message(msg.chat.id, text).await?;
        }
    }

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, dialogue: MyDialogue) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, chat::GREETING).await?;
        return Ok(());
    };

    let reply = chat::respond(text);
    let mut response = reply.text.clone();
    if let Some(kcal) = reply.calories {
        response.push_str(&format!("\n\n🔥 ~{} kcal", kcal));
    }

    match reply.workout {
        Some(workout) => {
            dialogue.update(State::PendingSave { workout }).await?;
            bot.send_message(msg.chat.id, response)
                .reply_markup(make_save_keyboard())
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, response).await?;
        }
    }

    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    db: SharedDb,
    planner: Planner,
) -> HandlerResult {
    let state = dialogue.get().await?.unwrap_or_default();

    if let (Some(data), Some(msg)) = (q.data.as_deref(), q.message.as_ref()) {
        let chat_id = msg.chat().id;

        match (data, state) {
            (SAVE_CALLBACK, State::PendingSave { workout }) => {
                let user = user_id(chat_id);
                let (id, workouts) = {
                    let mut db = db.lock().await;
                    let id = db.save(&user, &workout)?;
                    let workouts: Vec<Workout> =
                        db.list(&user)?.into_iter().map(|r| r.workout).collect();
                    (id, workouts)
                };
                info!("Saved workout {} for chat {}", id, chat_id);

                let mut text = SAVED.to_string();
                if let Some(next) = suggest_from_history(&planner, &workouts) {
                    text.push_str(&format!("\n\nNext up: {} {} day", next.emoji(), next));
                }
                bot.edit_message_reply_markup(chat_id, msg.id()).await?;
                bot.send_message(chat_id, text).await?;
                dialogue.reset().await?;
            }
            (DISCARD_CALLBACK, State::PendingSave { .. }) => {
                bot.edit_message_reply_markup(chat_id, msg.id()).await?;
                bot.send_message(chat_id, "Discarded.").await?;
                dialogue.reset().await?;
            }
            (other, _) => {
                warn!("Stale or unknown callback '{}' in chat {}", other, chat_id);
                bot.send_message(chat_id, "That workout is no longer pending. Send it again?")
                    .await?;
            }
        }
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}
