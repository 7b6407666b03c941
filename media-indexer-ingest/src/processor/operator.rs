//! Operator normalizer.
//!
//! Upstream operator names are mixed case and may carry a suffix: web
//! captions embed a language code (`WebCaptions_es`) and transcription names
//! the media type (`TranscribeVideo`). Normalization lowercases the name,
//! strips the suffix into arguments and resolves the closed set of operators
//! whose results are searchable.

use std::fmt;

use media_indexer_shared::DocumentType;

const WEBCAPTIONS_PREFIX: &str = "webcaptions_";

/// A lowercased operator key plus the arguments split off its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOperator {
    /// Canonical lowercase key.
    pub key: String,
    /// Suffix arguments (language code or media type).
    pub args: Vec<String>,
}

/// Normalize a raw operator name.
///
/// ```
/// use media_indexer_ingest::processor::normalize_operator;
///
/// let op = normalize_operator("WebCaptions_es");
/// assert_eq!(op.key, "webcaptions");
/// assert_eq!(op.args, vec!["es".to_string()]);
/// ```
pub fn normalize_operator(raw: &str) -> NormalizedOperator {
    let lowered = raw.to_lowercase();

    if let Some(language) = lowered.strip_prefix(WEBCAPTIONS_PREFIX) {
        if !language.is_empty() {
            return NormalizedOperator {
                key: "webcaptions".to_string(),
                args: vec![language.to_string()],
            };
        }
    }

    let args = match lowered.as_str() {
        "transcribevideo" => vec![MediaType::Video.as_str().to_string()],
        "transcribeaudio" => vec![MediaType::Audio.as_str().to_string()],
        _ => Vec::new(),
    };

    NormalizedOperator { key: lowered, args }
}

/// Media type of a transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Video,
    Audio,
}

impl MediaType {
    /// Lowercase name, also the prefix of the transcript document type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
        }
    }
}

/// Operators whose results are indexed.
///
/// Anything else resolves to [`Operator::Unsupported`], which is a deliberate
/// no-op rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    TextDetection,
    CelebrityRecognition,
    ContentModeration,
    FaceSearch,
    FaceDetection,
    MediaInfo,
    GenericDataLookup,
    LabelDetection,
    TechnicalCueDetection,
    ShotDetection,
    Translate,
    WebCaptions { language: String },
    Transcribe { media: MediaType },
    Entities,
    KeyPhrases,
    Unsupported { key: String },
}

impl Operator {
    /// Resolve a raw operator name.
    pub fn parse(raw: &str) -> Self {
        Self::from_normalized(normalize_operator(raw))
    }

    /// Resolve an already normalized operator.
    pub fn from_normalized(normalized: NormalizedOperator) -> Self {
        let NormalizedOperator { key, mut args } = normalized;

        match key.as_str() {
            "textdetection" => Operator::TextDetection,
            "celebrityrecognition" => Operator::CelebrityRecognition,
            "contentmoderation" => Operator::ContentModeration,
            "face_search" => Operator::FaceSearch,
            "facedetection" => Operator::FaceDetection,
            "mediainfo" => Operator::MediaInfo,
            "genericdatalookup" => Operator::GenericDataLookup,
            "labeldetection" => Operator::LabelDetection,
            "technicalcuedetection" => Operator::TechnicalCueDetection,
            "shotdetection" => Operator::ShotDetection,
            "translate" => Operator::Translate,
            "transcribevideo" => Operator::Transcribe {
                media: MediaType::Video,
            },
            "transcribeaudio" => Operator::Transcribe {
                media: MediaType::Audio,
            },
            "entities" => Operator::Entities,
            "key_phrases" => Operator::KeyPhrases,
            "webcaptions" if !args.is_empty() => Operator::WebCaptions {
                language: args.swap_remove(0),
            },
            _ => Operator::Unsupported { key },
        }
    }

    /// The `Operator` tag written into every document.
    pub fn tag(&self) -> String {
        match self {
            Operator::TextDetection => "textDetection".to_string(),
            Operator::CelebrityRecognition => "celebrity_detection".to_string(),
            Operator::ContentModeration => "content_moderation".to_string(),
            Operator::FaceSearch => "face_search".to_string(),
            Operator::FaceDetection => "face_detection".to_string(),
            Operator::MediaInfo => "mediainfo".to_string(),
            Operator::GenericDataLookup => "generic_data_lookup".to_string(),
            Operator::LabelDetection => "label_detection".to_string(),
            Operator::TechnicalCueDetection => "technical_cue_detection".to_string(),
            Operator::ShotDetection => "shot_detection".to_string(),
            Operator::Translate => "translation".to_string(),
            Operator::WebCaptions { language } => format!("{}{}", WEBCAPTIONS_PREFIX, language),
            Operator::Transcribe { .. } => "transcribe".to_string(),
            Operator::Entities => "entities".to_string(),
            Operator::KeyPhrases => "key_phrases".to_string(),
            Operator::Unsupported { key } => key.clone(),
        }
    }

    /// Document type the operator's results are written under.
    ///
    /// `None` for unsupported operators.
    pub fn document_type(&self) -> Option<DocumentType> {
        let name = match self {
            Operator::GenericDataLookup | Operator::LabelDetection => "labels".to_string(),
            Operator::TechnicalCueDetection => "technical_cues".to_string(),
            Operator::ShotDetection => "shots".to_string(),
            Operator::Transcribe { media } => format!("{}transcript", media.as_str()),
            Operator::Unsupported { .. } => return None,
            other => other.tag(),
        };
        Some(DocumentType::new(name))
    }

    /// Whether results of this operator are indexed at all.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Operator::Unsupported { .. })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}
