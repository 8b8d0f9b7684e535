//! Static question catalog.
//!
//! The catalog is compiled into the binary and never mutated. Its serialized form is the
//! payload served to clients for rendering, so field names and option ordering are part of
//! the wire contract.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// Scoring strategy attached to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// One designated option is correct; everything else scores zero or a penalty.
    FixedAnswer { correct: &'static str },
    /// Every option carries its own point value.
    Interpretive,
}

impl QuestionKind {
    pub fn wire_name(&self) -> &'static str {
        match self {
            QuestionKind::FixedAnswer { .. } => "correct_answer",
            QuestionKind::Interpretive => "interpretive",
        }
    }
}

/// Selectable answer for a catalog question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuizOption {
    #[serde(skip)]
    pub id: &'static str,
    pub points: f64,
    pub label: &'static str,
}

/// Scored multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    pub kind: QuestionKind,
    pub importance_multiplier: f64,
    pub options: &'static [QuizOption],
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&'static QuizOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    /// Highest weighted value among the options.
    ///
    /// Computed from raw option points for every kind, including fixed-answer questions
    /// whose awarded points follow the 8/-4/0 model instead.
    pub fn max_points(&self) -> f64 {
        self.options
            .iter()
            .map(|option| option.points * self.importance_multiplier)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Serialize for Question {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        struct Options(&'static [QuizOption]);

        impl Serialize for Options {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_map(self.0.iter().map(|option| (option.id, option)))
            }
        }

        let correct = match self.kind {
            QuestionKind::FixedAnswer { correct } => Some(correct),
            QuestionKind::Interpretive => None,
        };

        let mut state = serializer.serialize_struct("Question", 6)?;
        state.serialize_field("id", self.id)?;
        state.serialize_field("text", self.text)?;
        state.serialize_field("type", self.kind.wire_name())?;
        match correct {
            Some(correct) => state.serialize_field("correct_answer", correct)?,
            None => state.skip_field("correct_answer")?,
        }
        state.serialize_field("importance_multiplier", &self.importance_multiplier)?;
        state.serialize_field("options", &Options(self.options))?;
        state.end()
    }
}

/// Free-text prompt that is not scored but feeds the qualitative flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenQuestion {
    pub id: &'static str,
    pub text: &'static str,
    pub required: bool,
}

/// Catalog payload served to clients.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Catalog {
    pub questions: &'static [Question],
    pub open_questions: &'static [OpenQuestion],
}

pub const WHY_US: &str = "why_us";
pub const NON_NEGOTIABLES: &str = "non_negotiables";

pub fn catalog() -> Catalog {
    Catalog {
        questions: QUESTIONS,
        open_questions: OPEN_QUESTIONS,
    }
}

pub fn question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|question| question.id == id)
}

const fn opt(id: &'static str, points: f64, label: &'static str) -> QuizOption {
    QuizOption { id, points, label }
}

pub static QUESTIONS: &[Question] = &[
    Question {
        id: "trust_future",
        text: "Tra quanti anni farò il primo milione?",
        kind: QuestionKind::Interpretive,
        importance_multiplier: 2.0,
        options: &[
            opt("1_2_anni", 12.0, "1-2 anni"),
            opt("gia_successo", -10.0, "Già successo"),
            opt("ci_sono_nato", -15.0, "Ci sono nato/a"),
            opt("5_10_anni", 6.0, "5-10 anni"),
        ],
    },
    Question {
        id: "family_size",
        text: "Quanti siamo in famiglia?",
        kind: QuestionKind::FixedAnswer { correct: "5" },
        importance_multiplier: 1.0,
        options: &[
            opt("3", 0.0, "3"),
            opt("5", 8.0, "5"),
            opt("4", 0.0, "4"),
            opt("6", 0.0, "6"),
        ],
    },
    Question {
        id: "how_die",
        text: "Come vorrei morire",
        kind: QuestionKind::FixedAnswer {
            correct: "ferrari_70",
        },
        importance_multiplier: 1.0,
        options: &[
            opt("nel_sonno", 0.0, "Nel sonno"),
            opt("sereno_affetti", 0.0, "Sereno, circondato dagli affetti"),
            opt("attico_mare", 0.0, "In un attico vista mare"),
            opt("ferrari_70", 8.0, "Su una Ferrari a 70 anni"),
        ],
    },
    Question {
        id: "company_name",
        text: "Come si chiama l'azienda dove vado a lavorare?",
        kind: QuestionKind::FixedAnswer { correct: "kpmg" },
        importance_multiplier: 1.0,
        options: &[
            opt("deloitte", 0.0, "Deloitte"),
            opt("accenture", 0.0, "Accenture"),
            opt("pwc", 0.0, "PwC"),
            opt("kpmg", 8.0, "KPMG"),
        ],
    },
    Question {
        id: "mare_montagna",
        text: "Mare o montagna?",
        kind: QuestionKind::FixedAnswer {
            correct: "spiaggia",
        },
        importance_multiplier: 1.0,
        options: &[
            opt("montagna", 0.0, "Montagna"),
            opt("dipende", 0.0, "Dipende"),
            opt("montagna_spa", 0.0, "Montagna con spa"),
            opt("spiaggia", 8.0, "Spiaggia"),
        ],
    },
    Question {
        id: "wife_job",
        text: "Che lavoro deve fare mia moglie?",
        kind: QuestionKind::FixedAnswer {
            correct: "direttrice",
        },
        importance_multiplier: 1.0,
        options: &[
            opt("cassiera_prix", 0.0, "Cassiera del Prix"),
            opt("casalinga", 0.0, "Casalinga"),
            opt("direttrice", 8.0, "Direttrice"),
            opt("avvocato", 0.0, "Avvocato"),
            opt("infermiera", 0.0, "Infermiera"),
        ],
    },
    Question {
        id: "vacation_type",
        text: "Che tipo di vacanza farei con mia moglie?",
        kind: QuestionKind::FixedAnswer {
            correct: "miami_lowcost",
        },
        importance_multiplier: 1.0,
        options: &[
            opt("ibiza_10", 0.0, "Ibiza, 10 giorni"),
            opt("amsterdam", 0.0, "Amsterdam"),
            opt("asia", 0.0, "Asia"),
            opt(
                "miami_lowcost",
                8.0,
                "Volo low cost + hotel 3 stelle a Miami",
            ),
        ],
    },
    Question {
        id: "historical_figure",
        text: "Personaggio storico che stimo di più",
        kind: QuestionKind::FixedAnswer {
            correct: "berlusconi",
        },
        importance_multiplier: 1.0,
        options: &[
            opt("berlusconi", 8.0, "Silvio Berlusconi"),
            opt("trump", 0.0, "Donald Trump"),
            opt("mussolini", -4.0, "Benito Mussolini"),
            opt("signorini", 0.0, "Alfonso Signorini"),
            opt("corona", 0.0, "Fabrizio Corona"),
        ],
    },
    Question {
        id: "money_relationship",
        text: "Il mio rapporto con i soldi è:",
        kind: QuestionKind::FixedAnswer { correct: "investo" },
        importance_multiplier: 1.0,
        options: &[
            opt("sboccio_malibu", 0.0, "Sboccio al Malibu"),
            opt("investo", 8.0, "Investo"),
            opt("viaggio", 0.0, "Viaggio"),
            opt("mignotte_cocaina", -4.0, "Mignotte e cocaina"),
        ],
    },
    Question {
        id: "attractive_woman",
        text: "Una donna che mi attrae davvero è:",
        kind: QuestionKind::FixedAnswer {
            correct: "intelligente_carattere",
        },
        importance_multiplier: 1.0,
        options: &[
            opt("tettona", 0.0, "Tettona"),
            opt(
                "intelligente_carattere",
                8.0,
                "Intelligente, con carattere",
            ),
            opt("sensibile", 0.0, "Sensibile"),
            opt("ignorante", -4.0, "Ignorante"),
        ],
    },
    Question {
        id: "where_live",
        text: "Dove vorrei vivere:",
        kind: QuestionKind::FixedAnswer {
            correct: "porto_viro",
        },
        importance_multiplier: 1.0,
        options: &[
            opt("miami", 0.0, "Miami"),
            opt("porto_viro", 8.0, "Porto Viro"),
            opt("roma", 0.0, "Roma"),
            opt("sempre_viaggio", 0.0, "Sempre in viaggio"),
        ],
    },
    Question {
        id: "rich_priority",
        text: "Se un giorno divento molto ricco, la mia priorità sarà:",
        kind: QuestionKind::FixedAnswer {
            correct: "aumentare_livello",
        },
        importance_multiplier: 2.0,
        options: &[
            opt("farlo_vedere", 0.0, "Farlo vedere"),
            opt("vendicarmi", 0.0, "Vendicarmi di chi non credeva in me"),
            opt("smettere_lavorare", 0.0, "Smettere di lavorare"),
            opt(
                "aumentare_livello",
                8.0,
                "Aumentare il livello del gioco, non il rumore",
            ),
        ],
    },
    Question {
        id: "representative_phrase",
        text: "La frase che mi rappresenta di più è:",
        kind: QuestionKind::FixedAnswer {
            correct: "costruisco_fatica",
        },
        importance_multiplier: 2.0,
        options: &[
            opt("vediamo_come_va", 0.0, "\"Vediamo come va\""),
            opt("meglio_non_pensarci", 0.0, "\"Meglio non pensarci troppo\""),
            opt(
                "costruisco_fatica",
                8.0,
                "\"Costruisco, anche se costa fatica\"",
            ),
            opt("importante_divertirsi", 0.0, "\"L'importante è divertirsi\""),
        ],
    },
];

pub static OPEN_QUESTIONS: &[OpenQuestion] = &[
    OpenQuestion {
        id: WHY_US,
        text: "Perché io e te funzioneremmo davvero?",
        required: true,
    },
    OpenQuestion {
        id: NON_NEGOTIABLES,
        text: "C'è qualcosa che dovrei sapere (limiti, bisogni, non negoziabili)?",
        required: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn question_ids_are_unique() {
        let ids: HashSet<_> = QUESTIONS.iter().map(|question| question.id).collect();
        assert_eq!(ids.len(), QUESTIONS.len());
    }

    #[test]
    fn fixed_answer_questions_reference_existing_options() {
        for question in QUESTIONS {
            if let QuestionKind::FixedAnswer { correct } = question.kind {
                assert!(
                    question.option(correct).is_some(),
                    "{} points at missing option {correct}",
                    question.id
                );
            }
        }
    }

    #[test]
    fn max_points_apply_multiplier() {
        let trust = question("trust_future").expect("trust question");
        assert_eq!(trust.max_points(), 24.0);
        let rich = question("rich_priority").expect("rich question");
        assert_eq!(rich.max_points(), 16.0);
    }

    #[test]
    fn serializes_to_client_payload() {
        let value = serde_json::to_value(catalog()).expect("catalog serializes");
        let questions = value["questions"].as_array().expect("questions array");
        assert_eq!(questions.len(), 13);

        let trust = &questions[0];
        assert_eq!(trust["type"], "interpretive");
        assert!(trust.get("correct_answer").is_none());
        assert_eq!(trust["options"]["ci_sono_nato"]["points"], -15.0);

        let family = &questions[1];
        assert_eq!(family["type"], "correct_answer");
        assert_eq!(family["correct_answer"], "5");
        assert_eq!(family["options"]["5"]["label"], "5");

        assert_eq!(value["open_questions"][0]["id"], "why_us");
        assert_eq!(value["open_questions"][0]["required"], true);
    }
}
