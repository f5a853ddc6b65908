//! Foot switch pipeline
//!
//! Interrupt edge capture, debounce filter, press classifier and the
//! operational state machine. The [`FootSwitchActor`] drives the pipeline
//! from its edge mailbox and turns the resulting intents into messages.

pub mod classifier;
pub mod debounce;
pub mod interrupt;
pub mod state;

pub use classifier::{classify, PressClassifier, PressKind};
pub use debounce::{Debouncer, StableTransition, DEBOUNCE_WINDOW};
pub use interrupt::{
    edge_channel, EdgeEvent, EdgeInterrupt, EdgeSender, InputPin, SimulatedPin,
    EDGE_QUEUE_CAPACITY,
};
pub use state::{Intent, Outcome, SwitchState, SwitchStateMachine};

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::message::Message;
use crate::runtime::{Actor, Address, Mailbox, Received};
use async_trait::async_trait;
use tokio::time::Instant;

/// One classified press and what the state machine made of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressReport {
    pub press: PressKind,
    pub result: Result<Outcome>,
}

/// The synchronous pipeline behind the debounce task
#[derive(Debug, Clone)]
pub struct FootSwitch {
    debouncer: Debouncer,
    classifier: PressClassifier,
    machine: SwitchStateMachine,
}

impl FootSwitch {
    /// Build the pipeline from the boot configuration and the pin level
    /// read at start-up.
    pub fn new(config: &DeviceConfig, pressed_at_boot: bool, now: Instant) -> Self {
        let mut machine = SwitchStateMachine::new();
        machine.boot(pressed_at_boot);
        Self {
            debouncer: Debouncer::new(pressed_at_boot, now),
            classifier: PressClassifier::new(config.long_press_threshold_ms),
            machine,
        }
    }

    pub fn state(&self) -> SwitchState {
        self.machine.state()
    }

    /// Feed a raw edge. A level that had already settled before the edge
    /// arrived is accepted first, so its presses come back here.
    pub fn on_edge(&mut self, edge: EdgeEvent) -> Vec<PressReport> {
        let settled = self.poll(edge.at);
        self.debouncer.raw_input(edge.pressed, edge.at);
        settled
    }

    /// When the debouncer next needs to be polled
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Advance the pipeline to `now`, returning every press completed.
    pub fn poll(&mut self, now: Instant) -> Vec<PressReport> {
        let Some(transition) = self.debouncer.poll(now) else {
            return Vec::new();
        };

        self.classifier
            .on_stable(transition.pressed, transition.at)
            .iter()
            .map(|&press| PressReport {
                press,
                result: self.machine.handle(press),
            })
            .collect()
    }
}

/// Debounce task: owns the pipeline and posts intents.
pub struct FootSwitchActor {
    switch: FootSwitch,
    selector: Address<Message>,
    controller: Option<Address<Message>>,
}

impl FootSwitchActor {
    pub fn new(
        switch: FootSwitch,
        selector: Address<Message>,
        controller: Option<Address<Message>>,
    ) -> Self {
        Self {
            switch,
            selector,
            controller,
        }
    }

    fn dispatch(&self, intent: Intent) {
        let (target, message) = match intent {
            Intent::SelectNext => (Some(&self.selector), Message::SelectNext),
            Intent::SelectPrevious => (Some(&self.selector), Message::SelectPrevious),
            Intent::EnterOta => (self.controller.as_ref(), Message::OtaRequested),
        };

        match target {
            Some(address) => {
                if let Err(e) = address.send(message) {
                    tracing::warn!("Foot switch intent {:?} lost: {}", intent, e);
                }
            }
            None => tracing::warn!("No receiver for foot switch intent {:?}", intent),
        }
    }

    fn handle_reports(&self, reports: Vec<PressReport>) {
        for report in reports {
            match report.result {
                Ok(Outcome::Handled {
                    intent: Some(intent),
                    ..
                }) => self.dispatch(intent),
                Ok(_) => {}
                Err(e) => tracing::warn!("Foot switch: {}", e),
            }
        }
    }
}

#[async_trait]
impl Actor for FootSwitchActor {
    type Message = EdgeEvent;
    const NAME: &'static str = "foot_switch";

    async fn run(mut self, mut mailbox: Mailbox<EdgeEvent>) {
        loop {
            let received = match self.switch.next_deadline() {
                Some(deadline) => mailbox.receive_until(deadline).await,
                None => match mailbox.receive().await {
                    Some(edge) => Received::Message(edge),
                    None => Received::Closed,
                },
            };

            match received {
                Received::Message(edge) => {
                    let settled = self.switch.on_edge(edge);
                    self.handle_reports(settled);
                }
                Received::TimedOut => {}
                Received::Closed => break,
            }

            let reports = self.switch.poll(Instant::now());
            self.handle_reports(reports);
        }
    }
}
