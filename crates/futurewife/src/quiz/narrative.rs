//! Optional narrative text layered on top of a computed evaluation.
//!
//! Generation is best effort: every failure degrades to `None` so scoring and persistence
//! never depend on the remote model being reachable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::answers::AnswerSet;
use super::evaluation::Evaluation;
use crate::config::NarrativeConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The two texts requested for every scored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    Interpretation,
    FinalReport,
}

impl NarrativeKind {
    fn temperature(self) -> f32 {
        match self {
            NarrativeKind::Interpretation => 0.7,
            NarrativeKind::FinalReport => 0.8,
        }
    }

    fn max_tokens(self) -> u32 {
        match self {
            NarrativeKind::Interpretation => 500,
            NarrativeKind::FinalReport => 400,
        }
    }

    fn system_prompt(self) -> &'static str {
        match self {
            NarrativeKind::Interpretation => INTERPRETATION_SYSTEM_PROMPT,
            NarrativeKind::FinalReport => FINAL_REPORT_SYSTEM_PROMPT,
        }
    }
}

/// Collaborator producing free-form commentary for an evaluation.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(
        &self,
        kind: NarrativeKind,
        evaluation: &Evaluation,
        answers: &AnswerSet,
    ) -> Option<String>;
}

/// Used when no credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNarrator;

#[async_trait]
impl NarrativeGenerator for DisabledNarrator {
    async fn generate(
        &self,
        _kind: NarrativeKind,
        _evaluation: &Evaluation,
        _answers: &AnswerSet,
    ) -> Option<String> {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("narrative provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("narrative provider returned no choices")]
    EmptyResponse,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiNarrator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiNarrator {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, NarrativeError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn complete(
        &self,
        kind: NarrativeKind,
        evaluation: &Evaluation,
        answers: &AnswerSet,
    ) -> Result<String, NarrativeError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: kind.system_prompt().to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(kind, evaluation, answers),
                },
            ],
            max_tokens: kind.max_tokens(),
            temperature: kind.temperature(),
        };

        debug!(?kind, model = %self.model, "requesting narrative");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ChatResponse = response.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(NarrativeError::EmptyResponse)
    }
}

impl std::fmt::Debug for OpenAiNarrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiNarrator")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NarrativeGenerator for OpenAiNarrator {
    async fn generate(
        &self,
        kind: NarrativeKind,
        evaluation: &Evaluation,
        answers: &AnswerSet,
    ) -> Option<String> {
        match self.complete(kind, evaluation, answers).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(?kind, error = %err, "narrative generation failed");
                None
            }
        }
    }
}

/// Picks the narrator for the configured credentials, falling back to the disabled one.
pub fn narrator_from_config(config: &NarrativeConfig) -> Arc<dyn NarrativeGenerator> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Arc::new(DisabledNarrator);
    };

    match OpenAiNarrator::new(api_key, config.model.as_str(), config.base_url.as_str()) {
        Ok(narrator) => Arc::new(narrator),
        Err(err) => {
            warn!(error = %err, "narrative client unavailable, continuing without it");
            Arc::new(DisabledNarrator)
        }
    }
}

fn or_missing<'a>(value: &'a str, missing: &'a str) -> &'a str {
    if value.is_empty() {
        missing
    } else {
        value
    }
}

pub(crate) fn user_prompt(
    kind: NarrativeKind,
    evaluation: &Evaluation,
    answers: &AnswerSet,
) -> String {
    let why_us = or_missing(answers.why_us(), "Non fornita");
    let non_negotiables = or_missing(answers.non_negotiables(), "Non forniti");
    let strengths = evaluation.strengths.join(", ");
    let concerns = evaluation.concerns.join(", ");
    let red_flags = evaluation.red_flags.join(", ");

    match kind {
        NarrativeKind::Interpretation => format!(
            "Analizza questa valutazione di compatibilità sentimentale.

PUNTEGGIO FINALE: {score}/100
LIVELLO: {level}
VERDETTO: {verdict}

INDICI:
- Fiducia: {trust:.1}/10
- Visione: {vision:.1}/10
- Maturità emotiva: {maturity:.1}/10
- Allineamento ambizione: {ambition:.1}/10

RISPOSTE APERTE:
\"Perché funzioneremmo\": {why_us}
\"Non negoziabili\": {non_negotiables}

PUNTI DI FORZA: {strengths}
CRITICITÀ: {concerns}
RED FLAGS: {red_flags}

Genera un'interpretazione avanzata (max 300 parole) che:
1. Analizza la compatibilità reale oltre i numeri
2. Evidenzia pattern psicologici rilevanti
3. Indica se c'è allineamento profondo o solo superficiale
4. Suggerisce cosa potrebbe funzionare o non funzionare nella relazione
5. Mantiene un tono ironico ma intelligente, diretto, mai compiacente

Scrivi in italiano, stile lucido e adulto.",
            score = evaluation.final_score,
            level = evaluation.compatibility_level.label(),
            verdict = evaluation.verdict,
            trust = evaluation.trust_index,
            vision = evaluation.vision_index,
            maturity = evaluation.emotional_maturity_index,
            ambition = evaluation.ambition_alignment_index,
        ),
        NarrativeKind::FinalReport => {
            let breakdown = evaluation
                .points_breakdown
                .iter()
                .map(|entry| {
                    format!(
                        "- {}: {} ({:+.1} punti)",
                        entry.question, entry.answer, entry.points
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "Scrivi una valutazione testuale finale che interpreti questo risultato complessivo.

PUNTEGGIO FINALE: {score}/100
LIVELLO COMPATIBILITÀ: {level}

INDICI SINTETICI:
- Fiducia: {trust:.1}/10
- Visione: {vision:.1}/10
- Maturità emotiva: {maturity:.1}/10
- Allineamento ambizione: {ambition:.1}/10

BREAKDOWN PUNTI:
{breakdown}

PUNTI DI FORZA: {strengths}
CRITICITÀ: {concerns}
RED FLAGS: {red_flags}

RISPOSTE APERTE:
\"Perché funzioneremmo\": {why_us}
\"Non negoziabili\": {non_negotiables}

---

La valutazione deve includere:

1. LETTURA GENERALE: Una breve sintesi del profilo emerso (mentalità, visione, atteggiamento).

2. TIPO DI COMPATIBILITÀ: Scegli UNA categoria coerente con il risultato:
   - Non compatibile
   - Potenziale, ma fragile
   - Compatibile
   - Wife material

3. COSA FUNZIONA: 2-4 aspetti chiave che sono allineati con il soggetto.

4. COSA RISCHIA DI NON FUNZIONARE: 1-3 punti critici, senza giudizio morale.

5. VERDETTO FINALE: Una frase conclusiva elegante, netta, memorabile.

Scrivi tutto in un unico testo fluido, senza sezioni separate, senza elenchi puntati, senza emoji.
Il testo deve essere naturale, come se fosse scritto da una persona reale che valuta con lucidità.
Lunghezza: 120-200 parole.",
                score = evaluation.final_score,
                level = evaluation.compatibility_level.label(),
                trust = evaluation.trust_index,
                vision = evaluation.vision_index,
                maturity = evaluation.emotional_maturity_index,
                ambition = evaluation.ambition_alignment_index,
            )
        }
    }
}

const INTERPRETATION_SYSTEM_PROMPT: &str = "Sei un valutatore di compatibilità sentimentale ironico ma serio.
Il test misura allineamento mentale, visione, fiducia e maturità.

NON giudicare moralmente.
NON usare criteri discriminatori.
NON fare diagnosi psicologiche.
Valuta solo COMPATIBILITÀ con il soggetto.

Il soggetto ha:
- forte ambizione
- mentalità costruttiva
- bisogno di autonomia + rispetto
- visione a lungo termine
- intolleranza per superficialità, caos emotivo, interesse strumentale

TONO: ironico ma intelligente, diretto, mai offensivo, mai compiacente.
Stile: \"lucido, adulto, selettivo\".";

const FINAL_REPORT_SYSTEM_PROMPT: &str = "Sei un valutatore di compatibilità sentimentale.
Il contesto è un questionario ironico ma serio chiamato \"Come diventare la mia futura moglie\".

Il tuo compito NON è ricalcolare punteggi.
Il tuo compito è INTERPRETARE il risultato complessivo.

Il soggetto ha:
- forte ambizione
- mentalità costruttiva
- bisogno di autonomia + rispetto
- visione a lungo termine
- intolleranza per superficialità, caos emotivo, interesse strumentale

TONO E STILE:
- Ironico leggero, mai volgare
- Diretto, mai aggressivo
- Intelligente, mai paternalistico
- Sicuro, non arrogante
- Lucido, adulto, selettivo
- Non romantico, non crudele

Scrivi come qualcuno che \"non cerca chiunque, ma riconosce chi può stare al passo\".

OUTPUT:
- SOLO testo semplice (no JSON, no markdown, no emoji, no elenchi puntati)
- Lunghezza: 120-200 parole
- La valutazione deve sembrare scritta da una persona reale, non da un algoritmo";
