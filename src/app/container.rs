use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, ToolConfig};
use crate::app::{ConcatInteractor, InspectInteractor, MixInteractor};
use crate::domain::model::CodecSettings;
use crate::output::OutputVerifier;
use crate::planner::{AudioMixPlanner, ConcatenationPlanner};
use crate::ports::{ExecutePort, ProbePort};
use crate::probe::MediaInspector;

pub trait AppContainer: Send + Sync {
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn concat_interactor(&self) -> Arc<ConcatInteractor>;
    fn mix_interactor(&self) -> Arc<MixInteractor>;
}

pub struct DefaultAppContainer {
    inspect_interactor: Arc<InspectInteractor>,
    concat_interactor: Arc<ConcatInteractor>,
    mix_interactor: Arc<MixInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffprobe/ffmpeg adapters from a validated configuration
    pub fn new(config: &ToolConfig) -> Self {
        let probe_port = Arc::new(FFprobeAdapter::new(
            config.executables.ffprobe.clone(),
            config.probe_timeout(),
        ));
        let execute_port = Arc::new(FFmpegAdapter::new(
            config.executables.ffmpeg.clone(),
            config.timeout(),
            config.temp_dir(),
            config.engine_config(),
        ));

        Self::with_ports(probe_port, execute_port, config.codec_defaults.clone())
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        codec_defaults: CodecSettings,
    ) -> Self {
        let inspector = MediaInspector::new(Arc::clone(&probe_port));

        let verifier = OutputVerifier::new(inspector.clone());

        let inspect_interactor = Arc::new(InspectInteractor::new(inspector.clone()));

        let concat_interactor = Arc::new(ConcatInteractor::new(
            ConcatenationPlanner::new(inspector.clone(), codec_defaults),
            Arc::clone(&execute_port),
            verifier.clone(),
        ));

        let mix_interactor = Arc::new(MixInteractor::new(
            AudioMixPlanner::new(inspector),
            Arc::clone(&execute_port),
            verifier,
        ));

        Self {
            inspect_interactor,
            concat_interactor,
            mix_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn concat_interactor(&self) -> Arc<ConcatInteractor> {
        Arc::clone(&self.concat_interactor)
    }

    fn mix_interactor(&self) -> Arc<MixInteractor> {
        Arc::clone(&self.mix_interactor)
    }
}
