use std::sync::Arc;

use tracing::debug;

use crate::api::{ChartConfiguration, ChartConfigurationPatch, EngineConfig, WizardSession};
use crate::core::{ChartCatalog, ColorTheme, Dataset, ThemeCatalog};
use crate::error::ChartResult;
use crate::plot::{PlotCompiler, PlotSpecification};
use crate::render::Renderer;
use crate::store::{ChartId, ChartMetadata, ConfigurationStore, KeyValueStorage, RemoteMirror};

/// Entry point tying catalogs, compiler, store and renderer together.
pub struct ChartEngine<S: KeyValueStorage, R: Renderer> {
    config: EngineConfig,
    catalog: Arc<ChartCatalog>,
    themes: Arc<ThemeCatalog>,
    store: ConfigurationStore<S>,
    renderer: R,
}

impl<S: KeyValueStorage, R: Renderer> ChartEngine<S, R> {
    pub fn new(storage: S, renderer: R, config: EngineConfig) -> ChartResult<Self> {
        Self::with_themes(storage, renderer, config, ThemeCatalog::standard())
    }

    pub fn with_themes(
        storage: S,
        renderer: R,
        config: EngineConfig,
        themes: ThemeCatalog,
    ) -> ChartResult<Self> {
        let config = config.validate(&themes)?;
        let store = ConfigurationStore::new(storage).with_metadata_sync(config.metadata_sync);

        #[cfg(feature = "remote-mirror")]
        let store = match &config.remote {
            Some(remote) => store.with_mirror(Arc::new(crate::store::HttpMirror::new(
                remote.clone(),
            )?)),
            None => store,
        };

        Ok(Self {
            config,
            catalog: Arc::new(ChartCatalog::standard()),
            themes: Arc::new(themes),
            store,
            renderer,
        })
    }

    /// Replaces the remote mirror (if any) with `mirror`.
    #[must_use]
    pub fn with_mirror(mut self, mirror: Arc<dyn RemoteMirror>) -> Self {
        self.store = self.store.with_mirror(mirror);
        self
    }

    /// Adds or replaces a colour theme.
    #[must_use]
    pub fn with_theme(mut self, theme: ColorTheme) -> Self {
        let themes = (*self.themes).clone().with_theme(theme);
        self.themes = Arc::new(themes);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &ChartCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn themes(&self) -> &ThemeCatalog {
        &self.themes
    }

    #[must_use]
    pub fn store(&self) -> &ConfigurationStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigurationStore<S> {
        &mut self.store
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn compiler(&self) -> PlotCompiler<'_> {
        PlotCompiler::new(&self.catalog, &self.themes).with_missing_values(self.config.missing_values)
    }

    pub fn start_session(&self, dataset: Dataset) -> ChartResult<WizardSession> {
        WizardSession::new(
            dataset,
            Arc::clone(&self.catalog),
            Arc::clone(&self.themes),
            &self.config,
        )
    }

    pub fn create(&mut self, session: &WizardSession) -> ChartResult<ChartId> {
        session.create(&mut self.store)
    }

    pub fn open(&self, id: &ChartId) -> ChartResult<ChartConfiguration> {
        self.store.load(id)
    }

    pub fn compile(
        &self,
        config: &ChartConfiguration,
        dataset: &Dataset,
    ) -> ChartResult<PlotSpecification> {
        self.compiler().compile(config, dataset)
    }

    /// Compiles a stored chart from its persisted series and renders it.
    pub fn render_stored(&mut self, id: &ChartId) -> ChartResult<PlotSpecification> {
        let config = self.store.load(id)?;
        let spec = self.compiler().compile_stored(&config)?;
        self.renderer.render(&spec)?;
        debug!(chart_id = %id, "rendered stored chart");
        Ok(spec)
    }

    /// Applies `patch`, re-derives series from `dataset` and persists both.
    pub fn edit(
        &mut self,
        id: &ChartId,
        mut patch: ChartConfigurationPatch,
        dataset: &Dataset,
    ) -> ChartResult<PlotSpecification> {
        let mut candidate = self.store.load(id)?;
        patch.clone().apply_to(&mut candidate);
        let finalized = self.compiler().finalize(&candidate, dataset, None)?;

        patch.x_data = Some(finalized.x_data);
        patch.y_data = Some(finalized.y_data);
        patch.z_data = finalized.z_data;
        patch.z_recognized = finalized.z_recognized;
        patch.data_points = Some(finalized.data_points);

        let updated = self.store.update(id, patch)?;
        let spec = self.compiler().compile(&updated, dataset)?;
        self.renderer.render(&spec)?;
        Ok(spec)
    }

    pub fn gallery(&self) -> ChartResult<Vec<ChartMetadata>> {
        self.store.list()
    }

    pub fn delete(&mut self, id: &ChartId) -> ChartResult<()> {
        self.store.delete(id)
    }
}
