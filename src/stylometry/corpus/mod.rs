pub mod config;
pub mod document;

use std::{collections::HashSet, sync::Arc};

use log::{debug, info};
use rayon::prelude::*;

use crate::{
    error::{Result, StylometryError},
    stylometry::{
        matrix::{build_frequency_matrix, FrequencyMatrix},
        token::Tokenizer,
        vocab::{select_vocabulary, TokenFilter, Vocabulary},
        zscore::{normalize, ZScoreMatrix},
    },
};

use self::{config::CorpusConfig, document::Document};

/// Pipeline stage of a corpus
///
/// Each stage owns one cached artifact; reaching a stage implies every
/// earlier artifact is cached too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CorpusStage {
    Raw,
    Tokenized,
    VocabularyAssigned,
    FrequencyBuilt,
    Normalized,
}

/// Where the installed vocabulary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularySource {
    /// selected from this corpus
    Computed,
    /// installed with `assign_vocabulary`
    Assigned,
}

/// Ordered collection of documents and their derived artifacts
///
/// Artifacts are computed lazily on first access and cached:
/// `Raw → Tokenized → VocabularyAssigned → FrequencyBuilt → Normalized`.
/// Installing a different vocabulary drops the frequency and z-score caches;
/// re-tokenization happens only on explicit request.
#[derive(Debug)]
pub struct Corpus {
    documents: Vec<Document>,
    config: Arc<CorpusConfig>,
    filter: TokenFilter,
    stage: CorpusStage,
    // caches
    vocabulary: Option<(Vocabulary, VocabularySource)>,
    frequency: Option<FrequencyMatrix>,
    zscores: Option<ZScoreMatrix>,
}

impl Corpus {
    /// Create a corpus from parallel author / title / text lists
    ///
    /// # Errors
    /// * `ShapeMismatch` - the three lists differ in length
    /// * `InvalidVocabularySize` - `vocabulary_size` is 0
    /// * `InvalidTokenPattern` - `token_pattern` is not a valid regex
    pub fn new<A, T, X>(authors: Vec<A>, titles: Vec<T>, texts: Vec<X>, config: CorpusConfig) -> Result<Self>
    where
        A: Into<String>,
        T: Into<String>,
        X: Into<String>,
    {
        Self::with_shared_config(authors, titles, texts, Arc::new(config))
    }

    /// Same as `new`, sharing one configuration between corpora
    pub fn with_shared_config<A, T, X>(
        authors: Vec<A>,
        titles: Vec<T>,
        texts: Vec<X>,
        config: Arc<CorpusConfig>,
    ) -> Result<Self>
    where
        A: Into<String>,
        T: Into<String>,
        X: Into<String>,
    {
        if authors.len() != titles.len() || titles.len() != texts.len() {
            return Err(StylometryError::ShapeMismatch {
                authors: authors.len(),
                titles: titles.len(),
                texts: texts.len(),
            });
        }
        if config.vocabulary_size == 0 {
            return Err(StylometryError::InvalidVocabularySize);
        }
        let filter = TokenFilter::from_config(&config)?;
        let documents = authors
            .into_iter()
            .zip(titles)
            .zip(texts)
            .map(|((a, t), x)| Document::new(a.into(), t.into(), x.into()))
            .collect();
        Ok(Corpus {
            documents,
            config,
            filter,
            stage: CorpusStage::Raw,
            vocabulary: None,
            frequency: None,
            zscores: None,
        })
    }

    pub fn config(&self) -> &Arc<CorpusConfig> {
        &self.config
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn stage(&self) -> CorpusStage {
        self.stage
    }

    /// origin of the installed vocabulary, `None` before one exists
    pub fn vocabulary_source(&self) -> Option<VocabularySource> {
        self.vocabulary.as_ref().map(|(_, src)| *src)
    }

    /// Drop every cached artifact above `stage`
    ///
    /// A corpus never moves forward through this call.
    pub fn invalidate(&mut self, stage: CorpusStage) {
        if stage >= self.stage {
            return;
        }
        debug!("corpus invalidated: {:?} -> {:?}", self.stage, stage);
        if stage < CorpusStage::Normalized {
            self.zscores = None;
        }
        if stage < CorpusStage::FrequencyBuilt {
            self.frequency = None;
        }
        if stage < CorpusStage::VocabularyAssigned {
            self.vocabulary = None;
        }
        // tokens live on the documents and are replaced by the next tokenize
        self.stage = stage;
    }

    /// Tokenize every document
    ///
    /// A no-op once tokenized unless `force_recalculate` is set. A forced pass
    /// drops all derived artifacts; a vocabulary installed from outside is kept
    /// while a computed one is selected again.
    ///
    /// # Errors
    /// * `InvalidTokenizer` - the configured tokenizer cannot be built
    pub fn tokenize(&mut self, force_recalculate: bool) -> Result<()> {
        if self.stage >= CorpusStage::Tokenized && !force_recalculate {
            return Ok(());
        }
        let tokenizer: Arc<dyn Tokenizer> = self.config.tokenizer.resolve()?;
        let assigned = match self.vocabulary.take() {
            Some((vocab, VocabularySource::Assigned)) => Some(vocab),
            _ => None,
        };
        self.invalidate(CorpusStage::Raw);

        let token_lists: Vec<Vec<String>> = self
            .documents
            .par_iter()
            .map(|doc| tokenizer.tokenize(doc.text()))
            .collect();
        for (doc, tokens) in self.documents.iter_mut().zip(token_lists) {
            doc.set_tokens(tokens);
        }
        self.stage = CorpusStage::Tokenized;
        info!("tokenized {} documents", self.documents.len());

        if let Some(vocab) = assigned {
            self.vocabulary = Some((vocab, VocabularySource::Assigned));
            self.stage = CorpusStage::VocabularyAssigned;
        }
        Ok(())
    }

    /// Force a full recomputation on the next access
    pub fn recalculate(&mut self) -> Result<()> {
        self.tokenize(true)
    }

    /// Vocabulary of this corpus, selected from its own tokens unless one was assigned
    pub fn vocabulary(&mut self) -> Result<&Vocabulary> {
        self.tokenize(false)?;
        let entry = match self.vocabulary.take() {
            Some(entry) => entry,
            None => {
                let vocab = select_vocabulary(&self.documents, &self.filter, self.config.vocabulary_size);
                info!("vocabulary selected: {} tokens", vocab.len());
                (vocab, VocabularySource::Computed)
            }
        };
        if self.stage < CorpusStage::VocabularyAssigned {
            self.stage = CorpusStage::VocabularyAssigned;
        }
        Ok(&self.vocabulary.insert(entry).0)
    }

    /// Install a vocabulary, typically the one of a reference corpus
    ///
    /// Installing a vocabulary equal to the current one keeps the caches;
    /// anything else resets the corpus to `VocabularyAssigned`.
    pub fn assign_vocabulary(&mut self, vocabulary: Vocabulary) {
        if let Some((current, _)) = &self.vocabulary {
            if *current == vocabulary {
                debug!("assigned vocabulary unchanged, caches kept");
                self.vocabulary = Some((vocabulary, VocabularySource::Assigned));
                return;
            }
        }
        if self.stage > CorpusStage::Tokenized {
            self.invalidate(CorpusStage::Tokenized);
        }
        self.vocabulary = Some((vocabulary, VocabularySource::Assigned));
        if self.stage == CorpusStage::Tokenized {
            self.stage = CorpusStage::VocabularyAssigned;
        }
    }

    /// Per-document counts of the vocabulary tokens
    pub fn frequency_matrix(&mut self) -> Result<&FrequencyMatrix> {
        let matrix = match self.frequency.take() {
            Some(matrix) => matrix,
            None => {
                let vocab = self.vocabulary()?.clone();
                build_frequency_matrix(&self.documents, &vocab)
            }
        };
        if self.stage < CorpusStage::FrequencyBuilt {
            self.stage = CorpusStage::FrequencyBuilt;
        }
        Ok(self.frequency.insert(matrix))
    }

    /// Per-document z-scores of the vocabulary tokens
    pub fn zscores(&mut self) -> Result<&ZScoreMatrix> {
        let zscores = match self.zscores.take() {
            Some(zscores) => zscores,
            None => normalize(self.frequency_matrix()?),
        };
        self.stage = CorpusStage::Normalized;
        Ok(self.zscores.insert(zscores))
    }

    /// Tokens that are columns of the z-score matrix
    pub fn unique_tokens(&mut self) -> Result<HashSet<String>> {
        Ok(self.zscores()?.vocabulary().iter().map(str::to_string).collect())
    }

    /// cached z-scores without computing them
    pub fn cached_zscores(&self) -> Option<&ZScoreMatrix> {
        self.zscores.as_ref()
    }
}
