use std::{future::Future, time::Duration};

use tokio::{
    signal::unix::{signal, SignalKind},
    time::{self, Instant, MissedTickBehavior},
};

use super::{
    engine::Engine,
    source::{InputError, SourceInputDevice},
    state::Update,
    target::{TargetKeyboard, TargetMouse, Targets},
};

/// Fixed-tick control loop. Every tick polls the source device once, then
/// advances the [Engine] by the wall-clock time elapsed since the previous
/// tick.
pub struct Scheduler<S, K, M> {
    source: S,
    engine: Engine,
    keyboard: K,
    mouse: M,
    tick_interval: Duration,
    last_tick: Option<Instant>,
}

impl<S, K, M> Scheduler<S, K, M>
where
    S: SourceInputDevice,
    K: TargetKeyboard,
    M: TargetMouse,
{
    pub fn new(source: S, engine: Engine, keyboard: K, mouse: M, tick_interval: Duration) -> Self {
        Self {
            source,
            engine,
            keyboard,
            mouse,
            tick_interval,
            last_tick: None,
        }
    }

    #[cfg(test)]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[cfg(test)]
    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    #[cfg(test)]
    pub fn mouse(&self) -> &M {
        &self.mouse
    }

    /// Run the loop until the process receives Ctrl+C or SIGTERM
    pub async fn run(&mut self) -> Result<(), InputError> {
        self.run_until(shutdown_signal()).await
    }

    /// Run the loop until the given shutdown future completes or the source
    /// device fails. Every held key and button is released before returning.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), InputError>
    where
        F: Future<Output = ()>,
    {
        log::debug!("Starting scheduler with tick interval {:?}", self.tick_interval);
        let mut interval = time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    log::debug!("Scheduler received shutdown");
                    break Ok(());
                }
                _ = interval.tick() => {
                    if let Err(e) = self.tick(Instant::now()) {
                        log::error!("Failed to poll source device: {e}");
                        break Err(e);
                    }
                }
            }
        };

        let mut targets = Targets {
            keyboard: &mut self.keyboard,
            mouse: &mut self.mouse,
        };
        self.engine.shutdown(&mut targets);

        result
    }

    /// Run a single iteration of the loop at the given time
    pub fn tick(&mut self, now: Instant) -> Result<(), InputError> {
        if let Some(event) = self.source.poll()? {
            let initial = if event.is_initial() { "(initial) " } else { "" };
            let update = self.engine.apply(&event);
            let state = self.engine.state();
            match update {
                Some(Update::Axis(id, value)) => {
                    log::trace!("{initial}{}: {value:.3}", state.axis(id).name);
                }
                Some(Update::Button(id, pressed)) => {
                    let action = if pressed { "pressed" } else { "released" };
                    log::trace!("{initial}{} {action}", state.button(id).name);
                }
                None => (),
            }
        }

        // The first tick only establishes the reference time
        let delta = match self.last_tick.replace(now) {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };

        let mut targets = Targets {
            keyboard: &mut self.keyboard,
            mouse: &mut self.mouse,
        };
        self.engine.tick(delta, &mut targets);

        Ok(())
    }
}

/// Resolves once the process is asked to terminate
pub async fn shutdown_signal() {
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(terminate) => terminate,
        Err(e) => {
            log::warn!("Unable to listen for SIGTERM: {e}");
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Unable to listen for Ctrl+C: {e}");
            }
            return;
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                log::error!("Unable to listen for Ctrl+C: {e}");
            }
            log::info!("Received Ctrl+C");
        }
        _ = terminate.recv() => log::info!("Received SIGTERM"),
    }
}
