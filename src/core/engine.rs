use crate::core::catalog::Catalog;
use crate::core::draw::draw_spread;
use crate::core::prompt::{render_prompt, PromptContext};
use crate::core::splitter::split_fortune_text;
use crate::core::view::FortuneView;
use crate::core::zodiac::compute_age_and_zodiac;
use crate::domain::model::BirthProfile;
use crate::domain::ports::FortuneTeller;
use crate::utils::error::FortuneError;
use crate::utils::validation::validate_inputs;
use chrono::NaiveDate;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReadingSettings {
    pub min_question_length: usize,
    pub timeout: Duration,
    pub assets_dir: String,
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            min_question_length: 10,
            timeout: Duration::from_secs(60),
            assets_dir: "./assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FortuneRequest {
    pub birthdate: Option<String>,
    pub desire: Option<String>,
}

/// Everything decided before the fortune teller is consulted.
#[derive(Debug, Clone)]
pub struct PreparedReading {
    pub view: FortuneView,
    pub profile: BirthProfile,
    pub prompt: String,
    pub expected_paragraphs: usize,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FortuneEngine<T: FortuneTeller> {
    catalog: Arc<Catalog>,
    settings: ReadingSettings,
    teller: T,
    in_flight: AtomicBool,
}

impl<T: FortuneTeller> FortuneEngine<T> {
    pub fn new(catalog: Arc<Catalog>, settings: ReadingSettings, teller: T) -> Self {
        Self {
            catalog,
            settings,
            teller,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs one reading end to end. Every failure ends up in the returned
    /// view with the button re-enabled; nothing here aborts.
    pub async fn tell_fortune(&self, request: &FortuneRequest, today: NaiveDate) -> FortuneView {
        let Some(_guard) = self.begin() else {
            tracing::warn!("Rejected fortune request: one is already in flight");
            return FortuneView::initial(self.catalog.spread())
                .divining()
                .rejected(&FortuneError::RequestInFlight);
        };

        let prepared = match self.prepare(request, today, &mut rand::rng()) {
            Ok(prepared) => prepared,
            Err(view) => return view,
        };

        self.consult(prepared).await
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    /// Validation, draw, age and sign, prompt. On failure the view to show
    /// is returned as the error.
    pub fn prepare<R: Rng + ?Sized>(
        &self,
        request: &FortuneRequest,
        today: NaiveDate,
        rng: &mut R,
    ) -> std::result::Result<PreparedReading, FortuneView> {
        let spread = self.catalog.spread();
        let view = FortuneView::initial(spread);

        let desire = request.desire.as_deref();
        let birthdate = request.birthdate.as_deref();
        if let Err(e) = validate_inputs(birthdate, desire, self.settings.min_question_length) {
            tracing::warn!("Input rejected: {}", e);
            return Err(view.rejected(&e));
        }
        let view = view.divining();

        let draw = draw_spread(rng, self.catalog.deck(), spread, &self.settings.assets_dir)
            .map_err(|e| self.failed(view.clone(), e))?;
        tracing::info!("Cards drawn: {:?}", draw.names());
        let view = view.with_draw(&draw);

        let profile = compute_age_and_zodiac(birthdate.unwrap_or_default(), today, self.catalog.zodiac())
            .map_err(|e| self.failed(view.clone(), e))?;
        tracing::info!("Age {} with sign {}", profile.age, profile.sign);

        let context = PromptContext::assemble(
            &spread.prompt_terms,
            profile.age,
            &profile.sign,
            desire.unwrap_or_default(),
            &draw.names(),
        );
        let prompt = render_prompt(self.catalog.prompt_template(), &context)
            .map_err(|e| self.failed(view.clone(), e))?;

        Ok(PreparedReading {
            view,
            profile,
            prompt,
            expected_paragraphs: spread.card_count + 1,
        })
    }

    /// The only await point of a reading, bounded by the configured timeout.
    pub async fn consult(&self, prepared: PreparedReading) -> FortuneView {
        let PreparedReading {
            view,
            prompt,
            expected_paragraphs,
            ..
        } = prepared;

        tracing::debug!("Consulting fortune teller ({} chars)", prompt.len());
        let reply = match tokio::time::timeout(self.settings.timeout, self.teller.tell(&prompt)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return self.failed(view, e),
            Err(_) => {
                let e = FortuneError::ExternalServiceError {
                    message: format!("no reply within {:?}", self.settings.timeout),
                };
                return self.failed(view, e);
            }
        };

        match split_fortune_text(&reply, expected_paragraphs) {
            Ok(result) => {
                tracing::info!("Fortune told in {} paragraphs", expected_paragraphs);
                view.fortune_told(result)
            }
            Err(e) => {
                tracing::warn!("Could not fit fortune: {}", e);
                for (i, paragraph) in reply.split("\n\n").enumerate() {
                    tracing::debug!("{}\t{}", i, paragraph);
                }
                view.complicated_fortune(&reply)
            }
        }
    }

    fn failed(&self, view: FortuneView, error: FortuneError) -> FortuneView {
        tracing::error!(
            "Fortune failed: {} (Category: {:?}, Severity: {:?})",
            error,
            error.category(),
            error.severity()
        );
        tracing::error!("Recovery suggestion: {}", error.recovery_suggestion());
        view.unknown_fortune(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::{COMPLICATED, COMPLICATED_CARD, TOLD, UNKNOWN_CARD};
    use crate::core::zodiac::ZodiacTable;
    use crate::domain::model::{Card, Spread};
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    struct ScriptedTeller {
        reply: std::result::Result<String, String>,
        delay: Duration,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedTeller {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FortuneTeller for ScriptedTeller {
        async fn tell(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            tokio::time::sleep(self.delay).await;
            self.reply
                .clone()
                .map_err(|message| FortuneError::ExternalServiceError { message })
        }
    }

    fn catalog() -> Arc<Catalog> {
        let deck: Vec<Card> =
            serde_json::from_slice(include_bytes!("../../assets/tarot_deck_numbered.json")).unwrap();
        let spreads: Vec<Spread> =
            serde_json::from_slice(include_bytes!("../../assets/tarot_spreads.json")).unwrap();
        let zodiac = ZodiacTable::from_json(include_bytes!("../../assets/astrology.json")).unwrap();
        Arc::new(Catalog::from_parts(deck, spreads, zodiac, 0).unwrap())
    }

    fn engine(teller: ScriptedTeller) -> FortuneEngine<ScriptedTeller> {
        FortuneEngine::new(catalog(), ReadingSettings::default(), teller)
    }

    fn request() -> FortuneRequest {
        FortuneRequest {
            birthdate: Some("1990-07-04".to_string()),
            desire: Some("Will I find love this year?".to_string()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 3).unwrap()
    }

    #[test]
    fn test_prepare_builds_full_prompt() {
        let engine = engine(ScriptedTeller::replying(""));
        let mut rng = StdRng::seed_from_u64(3);
        let prepared = engine.prepare(&request(), today(), &mut rng).unwrap();

        assert_eq!(prepared.profile.age, 33);
        assert_eq!(prepared.profile.sign, "Cancer");
        assert_eq!(prepared.expected_paragraphs, 5);
        assert!(prepared.prompt.contains("33 years old"));
        assert!(prepared.prompt.contains("Cancer"));
        assert!(prepared.prompt.contains("Will I find love this year?"));
        assert!(!prepared.prompt.contains('{'));

        for slot in &prepared.view.slots {
            let drawn = slot.card.as_ref().unwrap();
            assert!(prepared.prompt.contains(&drawn.card.name));
        }
        assert!(!prepared.view.button.enabled);
    }

    #[tokio::test]
    async fn test_fortune_told() {
        let engine = engine(ScriptedTeller::replying("A\n\nB\n\nC\n\nD\n\nOverall"));
        let view = engine.tell_fortune(&request(), today()).await;

        let fortunes: Vec<&str> = view.slots.iter().map(|s| s.fortune.as_str()).collect();
        assert_eq!(fortunes, vec!["A", "B", "C", "D"]);
        assert_eq!(view.overall, "Overall");
        assert_eq!(view.button.label, TOLD);
        assert_eq!(engine.teller.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_short_question_never_reaches_teller() {
        let engine = engine(ScriptedTeller::replying("unused"));
        let request = FortuneRequest {
            desire: Some("1234567890".to_string()),
            ..request()
        };
        let view = engine.tell_fortune(&request, today()).await;

        assert_eq!(view.button.label, "ERROR: Need minimum 10 characters.");
        assert!(view.button.enabled);
        assert!(view.slots.iter().all(|slot| slot.card.is_none()));
        assert!(engine.teller.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_future_birthdate_keeps_cards() {
        let engine = engine(ScriptedTeller::replying("unused"));
        let request = FortuneRequest {
            birthdate: Some("2030-01-01".to_string()),
            ..request()
        };
        let view = engine.tell_fortune(&request, today()).await;

        assert_eq!(view.button.label, "Birthdate input incorrect...Try Again?");
        assert!(view.slots.iter().all(|slot| slot.card.is_some()));
        assert!(view.slots.iter().all(|slot| slot.fortune == UNKNOWN_CARD));
    }

    #[tokio::test]
    async fn test_mismatched_reply_falls_back() {
        let engine = engine(ScriptedTeller::replying("one long blob"));
        let view = engine.tell_fortune(&request(), today()).await;

        assert!(view.slots.iter().all(|slot| slot.fortune == COMPLICATED_CARD));
        assert_eq!(view.overall, "one long blob");
        assert_eq!(view.button.label, COMPLICATED);
        assert!(view.button.enabled);
    }

    #[tokio::test]
    async fn test_service_failure_is_retryable() {
        let engine = engine(ScriptedTeller::failing("503"));
        let view = engine.tell_fortune(&request(), today()).await;

        assert_eq!(view.button.label, "The spirits are silent...Try Again?");
        assert!(view.button.enabled);

        // the guard was released
        assert!(engine.begin().is_some());
    }

    #[tokio::test]
    async fn test_timeout() {
        let mut teller = ScriptedTeller::replying("A\n\nB\n\nC\n\nD\n\nE");
        teller.delay = Duration::from_millis(200);
        let settings = ReadingSettings {
            timeout: Duration::from_millis(20),
            ..ReadingSettings::default()
        };
        let engine = FortuneEngine::new(catalog(), settings, teller);

        let view = engine.tell_fortune(&request(), today()).await;
        assert_eq!(view.button.label, "The spirits are silent...Try Again?");
    }

    #[tokio::test]
    async fn test_one_request_in_flight() {
        let mut teller = ScriptedTeller::replying("A\n\nB\n\nC\n\nD\n\nE");
        teller.delay = Duration::from_millis(100);
        let engine = engine(teller);

        let request = request();
        let (first, second) = tokio::join!(
            engine.tell_fortune(&request, today()),
            engine.tell_fortune(&request, today())
        );

        assert_eq!(first.button.label, TOLD);
        assert_eq!(second.button.label, "Still divining...");
        assert_eq!(engine.teller.prompts.lock().unwrap().len(), 1);
    }
}
