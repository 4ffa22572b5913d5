//! Lifecycle driver standing in for the runtime base components.

use tracing::{debug, info_span};

use crate::bundle::Bundle;
use crate::channel::TransientChannel;
use crate::component::ComponentInstance;
use crate::error::Result;
use crate::holder::StateHolder;
use crate::saver::StateSaver;

/// Calls a saver at the points where an activity and its fragments would.
///
/// A configuration change saves every live component into one holder and
/// hands it over the transient channel; the recreated components consume it
/// once. Process death only leaves the saved bundle behind.
pub struct StateSavingHost {
    saver: Box<dyn StateSaver>,
    channel: TransientChannel,
}

impl StateSavingHost {
    pub fn new(saver: Box<dyn StateSaver>) -> Self {
        Self {
            saver,
            channel: TransientChannel::new(),
        }
    }

    pub fn channel(&self) -> &TransientChannel {
        &self.channel
    }

    /// `onSaveInstanceState` for every component into one container.
    pub fn save_instance_state(&self, components: &[ComponentInstance]) -> Result<Bundle> {
        let mut bundle = Bundle::new();
        for component in components {
            self.saver.save_state_bundle(component, &mut bundle)?;
        }
        Ok(bundle)
    }

    /// Saves `components` into one holder and puts it on the channel.
    pub fn tear_down_for_config_change(&mut self, components: &[ComponentInstance]) -> Result<()> {
        let span = info_span!("config_change", components = components.len());
        let _guard = span.enter();
        let mut holder: Option<StateHolder> = None;
        for component in components {
            holder = Some(self.saver.save_state_config_change(component, holder)?);
        }
        if let Some(holder) = holder {
            self.channel.put(holder);
        }
        Ok(())
    }

    /// `onCreate` of recreated components: the channel first, then `saved`.
    pub fn recreate(&mut self, components: &mut [ComponentInstance], saved: Option<&Bundle>) -> Result<()> {
        let span = info_span!("recreate", components = components.len());
        let _guard = span.enter();
        let mut holder = self.channel.take();
        if holder.is_none() {
            debug!("no retained holder on the channel");
        }
        for component in components.iter_mut() {
            if let Some(holder) = holder.as_mut() {
                self.saver.restore_state_config_change(component, holder)?;
            }
            if let Some(saved) = saved {
                self.saver.restore_state_bundle(component, saved)?;
            }
        }
        Ok(())
    }
}
