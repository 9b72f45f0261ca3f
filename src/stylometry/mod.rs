pub mod corpus;
pub mod evaluate;
pub mod matrix;
pub mod token;
pub mod vocab;
pub mod zscore;

use log::{debug, info};

use crate::{
    error::{Result, StylometryError},
    stylometry::{
        corpus::Corpus,
        evaluate::{
            delta::{author_deltas, document_deltas},
            result::{AuthorDeltas, DeltaResult},
        },
        zscore::ZScoreMatrix,
    },
};

/// How the test corpus gets its feature space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VocabularyAlignment {
    /// the test corpus is assigned the train corpus's vocabulary
    #[default]
    Shared,
    /// each corpus keeps its own vocabulary, deltas use the overlap
    Independent,
}

/// Configuration of the delta engine
#[derive(Debug, Clone, Default)]
pub struct DeltaConfig {
    pub alignment: VocabularyAlignment,
}

impl DeltaConfig {
    pub fn with_alignment(mut self, alignment: VocabularyAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Burrows' Delta between a train (reference) corpus and a test (query) corpus
///
/// Owns both corpora so that their caches stay consistent with the vocabulary
/// alignment; every computation brings both corpora up to `Normalized` first.
#[derive(Debug)]
pub struct BurrowsDelta {
    train: Corpus,
    test: Option<Corpus>,
    config: DeltaConfig,
}

impl BurrowsDelta {
    pub fn new(train: Corpus) -> Self {
        BurrowsDelta {
            train,
            test: None,
            config: DeltaConfig::default(),
        }
    }

    pub fn with_test_corpus(mut self, test: Corpus) -> Self {
        self.test = Some(test);
        self
    }

    pub fn with_config(mut self, config: DeltaConfig) -> Self {
        self.config = config;
        self
    }

    /// replace the test corpus, returning the previous one
    pub fn set_test_corpus(&mut self, test: Corpus) -> Option<Corpus> {
        self.test.replace(test)
    }

    pub fn config(&self) -> &DeltaConfig {
        &self.config
    }

    pub fn train(&self) -> &Corpus {
        &self.train
    }

    pub fn train_mut(&mut self) -> &mut Corpus {
        &mut self.train
    }

    pub fn test(&self) -> Option<&Corpus> {
        self.test.as_ref()
    }

    pub fn test_mut(&mut self) -> Option<&mut Corpus> {
        self.test.as_mut()
    }

    pub fn into_corpora(self) -> (Corpus, Option<Corpus>) {
        (self.train, self.test)
    }

    /// Bring both corpora to `Normalized`, aligning vocabularies first
    ///
    /// # Errors
    /// * `MissingTestCorpus` - no test corpus was supplied
    /// * any error of the corpus pipeline
    pub fn zscores(&mut self) -> Result<(&ZScoreMatrix, &ZScoreMatrix)> {
        let test = self.test.as_mut().ok_or(StylometryError::MissingTestCorpus)?;
        if self.config.alignment == VocabularyAlignment::Shared {
            let vocab = self.train.vocabulary()?.clone();
            debug!("sharing train vocabulary ({} tokens) with test corpus", vocab.len());
            test.assign_vocabulary(vocab);
        }
        let train_z = self.train.zscores()?;
        let test_z = test.zscores()?;
        Ok((train_z, test_z))
    }

    /// Delta of every train document against every test document, ascending
    pub fn document_deltas(&mut self) -> Result<DeltaResult> {
        let (train, test) = self.zscores()?;
        let result = document_deltas(train, test);
        info!(
            "document deltas: {} train x {} test documents, {} rows",
            train.n_rows(),
            test.n_rows(),
            result.len()
        );
        Ok(result)
    }

    /// Delta of every train author profile against every test document, ascending
    pub fn author_deltas(&mut self) -> Result<AuthorDeltas> {
        let (train, test) = self.zscores()?;
        let result = author_deltas(train, test);
        info!(
            "author deltas: {} test documents, {} rows",
            test.n_rows(),
            result.len()
        );
        Ok(result)
    }
}
