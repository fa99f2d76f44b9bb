// src/companion.rs
// One conversational turn: score, smooth, blend, compose, generate, commit

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{Span, debug, info, instrument, warn};

use crate::config::{DEFAULT_SESSION_KEY, EnvConfig};
use crate::error::{BakaError, Result};
use crate::llm::{LlmClient, Message, OpenRouterClient};
use crate::mood::{
    Action, BlendedEmotionState, EmotionStage, InMemorySessionStore, MoodLevel, MoodTransition,
    MoodTransitionEngine, SentimentAnalyzer, SessionMoodHistory, SessionSeed, SessionStore, blend,
    narrate, resolve_action_impact,
};
use crate::prompt::{PromptComposer, PromptInput};

/// Sent back when the generator returns no content or an empty string
pub const FALLBACK_REPLY: &str = "Hmm... I don't know what to say! 😅";

const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);

/// When a turn's history update is written back to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// Only after the generator replied; a failed call leaves history untouched
    #[default]
    OnSuccess,
    /// Before the generator call; a failed call still spends the turn
    Always,
}

impl CommitPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CommitPolicy::OnSuccess => "on-success",
            CommitPolicy::Always => "always",
        }
    }
}

impl fmt::Display for CommitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "on-success" | "onsuccess" => Ok(CommitPolicy::OnSuccess),
            "always" => Ok(CommitPolicy::Always),
            other => Err(format!("unknown commit policy: {}", other)),
        }
    }
}

/// What the user did this turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnInput {
    Message(String),
    Action {
        name: String,
        /// Accompanying text, used as context when the action is unknown
        message: Option<String>,
    },
}

impl TurnInput {
    /// Build from the raw request fields. An action wins over a message;
    /// empty strings count as absent, whitespace does not.
    pub fn from_parts(message: Option<String>, action: Option<String>) -> Result<Self> {
        let message = message.filter(|m| !m.is_empty());

        match action.filter(|a| !a.is_empty()) {
            Some(name) => Ok(TurnInput::Action { name, message }),
            None => message
                .map(TurnInput::Message)
                .ok_or_else(|| BakaError::InvalidInput("message or action is required".into())),
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self, TurnInput::Action { .. })
    }
}

/// A request for one turn
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub session_id: Option<String>,
    pub input: TurnInput,
    /// Caller's displayed stage; only used to seed a new session
    pub current_mood: Option<EmotionStage>,
    /// Caller's authoritative level before this turn
    pub mood_level: MoodLevel,
}

impl ChatTurn {
    pub fn new(input: TurnInput, mood_level: MoodLevel) -> Self {
        Self {
            session_id: None,
            input,
            current_mood: None,
            mood_level,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_current_mood(mut self, mood: EmotionStage) -> Self {
        self.current_mood = Some(mood);
        self
    }

    fn seed(&self) -> SessionSeed {
        SessionSeed {
            mood: self
                .current_mood
                .unwrap_or_else(|| self.mood_level.displayed_stage()),
            level: self.mood_level,
        }
    }
}

/// Everything computed for a turn before the generator is called
#[derive(Debug, Clone)]
pub struct TurnPlan {
    /// History as it will be after this turn commits
    pub history: SessionMoodHistory,
    pub transition: MoodTransition,
    pub emotion: BlendedEmotionState,
    pub action_context: Option<String>,
    pub system_prompt: String,
    pub user_content: String,
}

impl TurnPlan {
    pub fn messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt.clone()),
            Message::user(self.user_content.clone()),
        ]
    }
}

/// Result of a completed turn
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub session_id: String,
    pub reply: String,
    pub new_mood: EmotionStage,
    pub updated_mood_level: MoodLevel,
    pub emotion: BlendedEmotionState,
    pub score: f64,
    pub delta: f64,
    /// Generator returned no content and the fallback was sent
    pub fallback: bool,
}

/// Orchestrates the mood engine and the generator for every session
pub struct Companion {
    analyzer: SentimentAnalyzer,
    engine: MoodTransitionEngine,
    composer: PromptComposer,
    store: Arc<dyn SessionStore>,
    llm: Option<Arc<dyn LlmClient>>,
    policy: CommitPolicy,
    llm_timeout: Duration,
    default_session: String,
}

impl Companion {
    /// `llm` of `None` means no credential: turns are rejected, nothing is stored
    pub fn new(store: Arc<dyn SessionStore>, llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self {
            analyzer: SentimentAnalyzer::new(),
            engine: MoodTransitionEngine::new(),
            composer: PromptComposer::default(),
            store,
            llm,
            policy: CommitPolicy::default(),
            llm_timeout: DEFAULT_LLM_TIMEOUT,
            default_session: DEFAULT_SESSION_KEY.to_string(),
        }
    }

    /// Wire up the in-memory store and the OpenRouter client from env config
    pub fn from_config(config: &EnvConfig) -> Self {
        let store = InMemorySessionStore::new(
            config.sessions.max_sessions,
            config.sessions.idle_ttl,
        );
        let llm = config
            .api_keys
            .openrouter
            .clone()
            .map(|key| Arc::new(OpenRouterClient::from_config(key, &config.llm)) as Arc<dyn LlmClient>);

        Self::new(Arc::new(store), llm)
            .with_policy(config.commit_policy)
            .with_llm_timeout(config.llm.timeout)
            .with_persona(config.persona_name())
            .with_default_session(config.sessions.default_session.clone())
    }

    pub fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_llm_timeout(mut self, llm_timeout: Duration) -> Self {
        self.llm_timeout = llm_timeout;
        self
    }

    pub fn with_persona(mut self, name: impl Into<String>) -> Self {
        self.composer = PromptComposer::new(name);
        self
    }

    pub fn with_default_session(mut self, key: impl Into<String>) -> Self {
        self.default_session = key.into();
        self
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// Resolve the store key for a request
    pub fn session_key(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(self.default_session.as_str())
            .to_string()
    }

    /// Raw score for the input: action impact for actions, lexical score otherwise
    pub fn score(&self, input: &TurnInput, current: MoodLevel) -> f64 {
        match input {
            TurnInput::Message(text) => self.analyzer.analyze(text),
            TurnInput::Action { name, .. } => resolve_action_impact(name, current),
        }
    }

    /// Compute the turn against a copy of `history`. Pure: the caller decides
    /// whether the returned history is committed.
    pub fn plan(&self, history: &SessionMoodHistory, input: &TurnInput, current: MoodLevel) -> TurnPlan {
        let raw_score = self.score(input, current);

        let mut next = history.clone();
        let transition = self.engine.transition(&mut next, raw_score, current);
        let emotion = blend(transition.level);

        let action_context = match input {
            TurnInput::Message(_) => None,
            TurnInput::Action { name, message } => match name.parse::<Action>() {
                Ok(action) => Some(action.context_sentence().to_string()),
                Err(_) => message.clone(),
            },
        };

        let user_content = match input {
            TurnInput::Message(text) => text.clone(),
            TurnInput::Action { name, .. } => action_context
                .clone()
                .unwrap_or_else(|| format!("The user {}.", narrate(name))),
        };

        let system_prompt = self.composer.compose(&PromptInput {
            emotion: &emotion,
            mood_level: transition.level,
            avg_recent_sentiment: transition.avg_recent,
            action_context: action_context.as_deref(),
        });

        TurnPlan {
            history: next,
            transition,
            emotion,
            action_context,
            system_prompt,
            user_content,
        }
    }

    /// Run one turn end to end.
    ///
    /// The session lock is held from planning until the commit decision, so
    /// overlapping turns for one session apply in order.
    #[instrument(skip(self, turn), fields(session_id, action = turn.input.is_action()))]
    pub async fn respond(&self, turn: ChatTurn) -> Result<TurnOutcome> {
        let llm = self
            .llm
            .clone()
            .ok_or_else(|| BakaError::Config("OPENROUTER_API_KEY is not set".into()))?;

        let session_id = self.session_key(turn.session_id.as_deref());
        Span::current().record("session_id", session_id.as_str());

        let handle = self.store.session(&session_id, turn.seed()).await;
        let mut history = handle.lock().await;

        let plan = self.plan(&history, &turn.input, turn.mood_level);
        let transition = &plan.transition;
        info!(
            score = transition.raw_score,
            delta = transition.delta,
            avg_recent = transition.avg_recent,
            trend = ?transition.trend,
            old_level = transition.previous.value(),
            new_level = transition.level.value(),
            primary = %plan.emotion.primary,
            secondary = ?plan.emotion.secondary,
            displayed = %plan.emotion.displayed,
            "Mood transition"
        );
        debug!(prompt_len = plan.system_prompt.len(), "Composed system prompt");

        if self.policy == CommitPolicy::Always {
            *history = plan.history.clone();
            self.store.reinstate(&session_id, &handle).await;
        }

        let result = match timeout(self.llm_timeout, llm.chat(plan.messages())).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(model = %llm.model_name(), policy = %self.policy, "Generator call failed: {:#}", e);
                return Err(BakaError::Upstream(format!("{:#}", e)));
            }
            Err(_) => {
                warn!(
                    model = %llm.model_name(),
                    timeout_secs = self.llm_timeout.as_secs_f64(),
                    policy = %self.policy,
                    "Generator call timed out"
                );
                return Err(BakaError::Timeout(self.llm_timeout));
            }
        };

        let TurnPlan {
            history: next,
            transition,
            emotion,
            ..
        } = plan;

        if self.policy == CommitPolicy::OnSuccess {
            *history = next;
            self.store.reinstate(&session_id, &handle).await;
        }
        drop(history);

        let (reply, fallback) = match result.text() {
            Some(text) => (text.to_string(), false),
            None => {
                warn!(request_id = %result.request_id, "Empty generator reply, using fallback");
                (FALLBACK_REPLY.to_string(), true)
            }
        };

        info!(
            request_id = %result.request_id,
            new_mood = %emotion.displayed,
            level = transition.level.value(),
            reply_len = reply.len(),
            "Turn complete"
        );

        Ok(TurnOutcome {
            session_id,
            reply,
            new_mood: emotion.displayed,
            updated_mood_level: transition.level,
            emotion,
            score: transition.raw_score,
            delta: transition.delta,
            fallback,
        })
    }

    /// Copy of a session's history, if it exists
    pub async fn session(&self, session_id: &str) -> Option<SessionMoodHistory> {
        let handle = self.store.peek(session_id).await?;
        let history = handle.lock().await;
        Some(history.clone())
    }

    /// Forget a session; returns whether it existed
    pub async fn forget(&self, session_id: &str) -> bool {
        let removed = self.store.remove(session_id).await;
        if removed {
            info!(session_id, "Session removed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatResult;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    const EPS: f64 = 1e-9;

    enum Behavior {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct StubLlm {
        behavior: Behavior,
        seen: StdMutex<Vec<Vec<Message>>>,
    }

    impl StubLlm {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                seen: StdMutex::new(Vec::new()),
            })
        }

        fn last_messages(&self) -> Vec<Message> {
            self.seen.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn chat(&self, messages: Vec<Message>) -> anyhow::Result<ChatResult> {
            self.seen.lock().unwrap().push(messages);
            match self.behavior {
                Behavior::Reply(text) => Ok(ChatResult {
                    request_id: "stub".into(),
                    content: Some(text.to_string()),
                    ..ChatResult::default()
                }),
                Behavior::Fail => anyhow::bail!("API request failed: 502 Bad Gateway"),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(ChatResult::default())
                }
            }
        }

        fn model_name(&self) -> String {
            "stub".into()
        }
    }

    fn companion(llm: Arc<StubLlm>) -> Companion {
        Companion::new(Arc::new(InMemorySessionStore::default()), Some(llm))
    }

    fn message_turn(text: &str, level: f64) -> ChatTurn {
        ChatTurn::new(TurnInput::Message(text.into()), MoodLevel::new(level))
    }

    fn action_turn(name: &str, level: f64) -> ChatTurn {
        ChatTurn::new(
            TurnInput::Action {
                name: name.into(),
                message: None,
            },
            MoodLevel::new(level),
        )
    }

    // ========================================================================
    // Input parsing
    // ========================================================================

    #[test]
    fn test_turn_input_requires_something() {
        assert!(matches!(
            TurnInput::from_parts(None, None),
            Err(BakaError::InvalidInput(_))
        ));
        assert!(TurnInput::from_parts(Some("".into()), Some("".into())).is_err());
    }

    #[test]
    fn test_turn_input_whitespace_is_present() {
        assert_eq!(
            TurnInput::from_parts(Some("   ".into()), Some("".into())).unwrap(),
            TurnInput::Message("   ".into())
        );
        assert_eq!(
            TurnInput::from_parts(None, Some(" ".into())).unwrap(),
            TurnInput::Action {
                name: " ".into(),
                message: None
            }
        );
    }

    #[test]
    fn test_turn_input_action_wins() {
        let input = TurnInput::from_parts(Some("hi".into()), Some("pat".into())).unwrap();
        assert_eq!(
            input,
            TurnInput::Action {
                name: "pat".into(),
                message: Some("hi".into())
            }
        );
        assert_eq!(
            TurnInput::from_parts(Some("hi".into()), None).unwrap(),
            TurnInput::Message("hi".into())
        );
    }

    #[test]
    fn test_commit_policy_parse() {
        assert_eq!("on-success".parse::<CommitPolicy>().unwrap(), CommitPolicy::OnSuccess);
        assert_eq!("ON_SUCCESS".parse::<CommitPolicy>().unwrap(), CommitPolicy::OnSuccess);
        assert_eq!("always".parse::<CommitPolicy>().unwrap(), CommitPolicy::Always);
        assert!("never".parse::<CommitPolicy>().is_err());
        assert_eq!(CommitPolicy::default().to_string(), "on-success");
    }

    #[test]
    fn test_session_key_defaults() {
        let c = companion(StubLlm::new(Behavior::Reply("ok")));
        assert_eq!(c.session_key(None), "default_session");
        assert_eq!(c.session_key(Some("  ")), "default_session");
        assert_eq!(c.session_key(Some("abc")), "abc");
        let c = c.with_default_session("lobby");
        assert_eq!(c.session_key(None), "lobby");
    }

    // ========================================================================
    // Planning
    // ========================================================================

    #[test]
    fn test_plan_does_not_touch_history() {
        let c = companion(StubLlm::new(Behavior::Reply("ok")));
        let history = SessionMoodHistory::default();
        let plan = c.plan(&history, &TurnInput::Message("I love you".into()), MoodLevel::new(2.0));
        assert!(history.is_empty());
        assert_eq!(plan.history.len(), 1);
        assert_eq!(plan.user_content, "I love you");
        assert!(plan.action_context.is_none());
        assert!(!plan.system_prompt.contains("IMMEDIATE CONTEXT"));
    }

    #[test]
    fn test_plan_known_action_uses_context_sentence() {
        let c = companion(StubLlm::new(Behavior::Reply("ok")));
        let input = TurnInput::Action {
            name: "kiss".into(),
            message: None,
        };
        let plan = c.plan(&SessionMoodHistory::default(), &input, MoodLevel::new(0.5));
        assert_eq!(plan.transition.raw_score, -1.0);
        assert_eq!(plan.user_content, "The user just tried to kiss you!");
        assert!(plan.system_prompt.contains("IMMEDIATE CONTEXT"));
        assert!(plan.system_prompt.contains("The user just tried to kiss you!"));
    }

    #[test]
    fn test_plan_unknown_action_scores_zero() {
        let c = companion(StubLlm::new(Behavior::Reply("ok")));
        let input = TurnInput::Action {
            name: "dance".into(),
            message: None,
        };
        let plan = c.plan(&SessionMoodHistory::default(), &input, MoodLevel::new(4.0));
        assert_eq!(plan.transition.raw_score, 0.0);
        assert_eq!(plan.transition.level.value(), 4.0);
        assert_eq!(plan.user_content, "The user did something.");
        assert!(!plan.system_prompt.contains("IMMEDIATE CONTEXT"));
    }

    #[test]
    fn test_plan_unknown_action_with_message_uses_message_as_context() {
        let c = companion(StubLlm::new(Behavior::Reply("ok")));
        let input = TurnInput::Action {
            name: "dance".into(),
            message: Some("The user spins you around.".into()),
        };
        let plan = c.plan(&SessionMoodHistory::default(), &input, MoodLevel::new(4.0));
        assert_eq!(plan.user_content, "The user spins you around.");
        assert!(plan.system_prompt.contains("IMMEDIATE CONTEXT"));
    }

    #[test]
    fn test_plan_miscased_action_is_unknown() {
        let c = companion(StubLlm::new(Behavior::Reply("ok")));
        let input = TurnInput::Action {
            name: "Kiss".into(),
            message: Some("*leans in*".into()),
        };
        let plan = c.plan(&SessionMoodHistory::default(), &input, MoodLevel::new(8.5));
        assert_eq!(plan.transition.raw_score, 0.0);
        assert_eq!(plan.action_context.as_deref(), Some("*leans in*"));
        assert_eq!(plan.user_content, "*leans in*");
        assert!(!plan.system_prompt.contains("The user just tried to kiss you!"));
    }

    // ========================================================================
    // Full turns
    // ========================================================================

    #[tokio::test]
    async fn test_message_turn() {
        let llm = StubLlm::new(Behavior::Reply("B-baka! It's not like I like you..."));
        let c = companion(llm.clone());

        let outcome = c.respond(message_turn("I love you", 2.0)).await.unwrap();
        assert_eq!(outcome.reply, "B-baka! It's not like I like you...");
        assert!(!outcome.fallback);
        assert_eq!(outcome.session_id, "default_session");
        assert!((outcome.updated_mood_level.value() - 2.6).abs() < EPS);
        assert_eq!(outcome.new_mood, EmotionStage::Neutral);

        let messages = llm.last_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].content.as_deref(), Some("I love you"));

        let history = c.session("default_session").await.unwrap();
        assert_eq!(history.turns, 1);
        assert!((history.last_mood_level.value() - 2.6).abs() < EPS);
    }

    #[tokio::test]
    async fn test_sustained_trend_across_turns() {
        let c = companion(StubLlm::new(Behavior::Reply("hmph")));
        let mut level = 2.0;
        for _ in 0..3 {
            let outcome = c
                .respond(message_turn("love", level).with_session("trend"))
                .await
                .unwrap();
            level = outcome.updated_mood_level.value();
        }
        assert!((level - 4.6).abs() < EPS);
    }

    #[tokio::test]
    async fn test_action_turn() {
        let llm = StubLlm::new(Behavior::Reply("W-what are you doing?!"));
        let c = companion(llm.clone());

        let outcome = c.respond(action_turn("kiss", 0.5)).await.unwrap();
        assert_eq!(outcome.score, -1.0);
        assert!((outcome.updated_mood_level.value() - 0.2).abs() < EPS);
        assert_eq!(outcome.new_mood, EmotionStage::Angry);
        assert_eq!(
            llm.last_messages()[1].content.as_deref(),
            Some("The user just tried to kiss you!")
        );
    }

    #[tokio::test]
    async fn test_empty_reply_uses_fallback() {
        let c = companion(StubLlm::new(Behavior::Reply("")));
        let outcome = c.respond(message_turn("hello?", 2.0)).await.unwrap();
        assert_eq!(outcome.reply, FALLBACK_REPLY);
        assert!(outcome.fallback);
        assert_eq!(c.session("default_session").await.unwrap().turns, 1);
    }

    #[tokio::test]
    async fn test_whitespace_reply_is_passed_through() {
        let c = companion(StubLlm::new(Behavior::Reply("  ")));
        let outcome = c.respond(message_turn("hello?", 2.0)).await.unwrap();
        assert_eq!(outcome.reply, "  ");
        assert!(!outcome.fallback);
    }

    #[tokio::test]
    async fn test_missing_credential_touches_nothing() {
        let store = Arc::new(InMemorySessionStore::default());
        let c = Companion::new(store.clone(), None);
        let err = c.respond(message_turn("hi", 2.0)).await.unwrap_err();
        assert!(matches!(err, BakaError::Config(_)));
        assert!(store.peek("default_session").await.is_none());
    }

    // ========================================================================
    // Commit policy
    // ========================================================================

    #[tokio::test]
    async fn test_failure_on_success_policy_keeps_history() {
        let c = companion(StubLlm::new(Behavior::Fail));
        let err = c.respond(message_turn("I love you", 2.0)).await.unwrap_err();
        assert!(matches!(err, BakaError::Upstream(ref msg) if msg.contains("502")));

        let history = c.session("default_session").await.unwrap();
        assert!(history.is_empty());
        assert_eq!(history.turns, 0);
        assert_eq!(history.last_mood_level.value(), 2.0);
    }

    #[tokio::test]
    async fn test_failure_always_policy_spends_turn() {
        let c = companion(StubLlm::new(Behavior::Fail)).with_policy(CommitPolicy::Always);
        assert!(c.respond(message_turn("I love you", 2.0)).await.is_err());

        let history = c.session("default_session").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.turns, 1);
        assert!((history.last_mood_level.value() - 2.6).abs() < EPS);
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let c = companion(StubLlm::new(Behavior::Hang)).with_llm_timeout(Duration::from_millis(20));
        let err = c.respond(message_turn("hi", 2.0)).await.unwrap_err();
        assert!(matches!(err, BakaError::Timeout(d) if d == Duration::from_millis(20)));
        assert!(c.session("default_session").await.unwrap().is_empty());
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    #[tokio::test]
    async fn test_concurrent_turns_same_session_all_recorded() {
        let c = Arc::new(companion(StubLlm::new(Behavior::Reply("ok"))));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let c = c.clone();
            tasks.push(tokio::spawn(async move {
                c.respond(message_turn("thanks", 3.0).with_session("shared")).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let history = c.session("shared").await.unwrap();
        assert_eq!(history.turns, 8);
        assert_eq!(history.len(), 5);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let c = companion(StubLlm::new(Behavior::Reply("ok")));
        c.respond(message_turn("love", 2.0).with_session("a")).await.unwrap();
        c.respond(message_turn("love", 2.0).with_session("a")).await.unwrap();
        c.respond(message_turn("love", 2.0).with_session("b")).await.unwrap();

        assert_eq!(c.session("a").await.unwrap().turns, 2);
        assert_eq!(c.session("b").await.unwrap().turns, 1);
    }

    #[tokio::test]
    async fn test_seed_uses_current_mood() {
        let c = companion(StubLlm::new(Behavior::Fail));
        let turn = message_turn("hi", 5.0)
            .with_session("seeded")
            .with_current_mood(EmotionStage::Shy);
        let _ = c.respond(turn).await;
        assert_eq!(c.session("seeded").await.unwrap().last_mood, EmotionStage::Shy);
    }

    #[tokio::test]
    async fn test_commit_survives_eviction_mid_turn() {
        let store = Arc::new(InMemorySessionStore::default());
        let c = Companion::new(store.clone(), Some(StubLlm::new(Behavior::Reply("ok"))));

        // Drop the entry while the turn still holds the handle
        let handle = store.session("held", SessionSeed::default()).await;
        let guard = handle.lock().await;
        let baseline = Arc::strong_count(&handle);
        let turn = tokio::spawn({
            let c = Arc::new(c);
            async move { c.respond(message_turn("love", 2.0).with_session("held")).await }
        });
        while Arc::strong_count(&handle) <= baseline {
            tokio::task::yield_now().await;
        }
        store.remove("held").await;
        drop(guard);

        turn.await.unwrap().unwrap();
        let history = store.peek("held").await.unwrap();
        assert_eq!(history.lock().await.turns, 1);
    }

    #[tokio::test]
    async fn test_forget() {
        let c = companion(StubLlm::new(Behavior::Reply("ok")));
        c.respond(message_turn("hi", 2.0).with_session("gone")).await.unwrap();
        assert!(c.forget("gone").await);
        assert!(!c.forget("gone").await);
        assert!(c.session("gone").await.is_none());
    }
}
