//! Delivery sink: where accepted channel messages leave the client.

use tokio::sync::mpsc;

use chansub_core::ChannelMessage;

/// Receives every accepted, channel-matching message in arrival order.
pub trait DeliverySink {
    fn deliver(&mut self, msg: ChannelMessage);
}

impl DeliverySink for Vec<ChannelMessage> {
    fn deliver(&mut self, msg: ChannelMessage) {
        self.push(msg);
    }
}

impl DeliverySink for mpsc::UnboundedSender<ChannelMessage> {
    fn deliver(&mut self, msg: ChannelMessage) {
        if self.send(msg).is_err() {
            tracing::debug!("delivery receiver dropped; message discarded");
        }
    }
}

impl<S: DeliverySink + ?Sized> DeliverySink for Box<S> {
    fn deliver(&mut self, msg: ChannelMessage) {
        (**self).deliver(msg);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(ChannelMessage)> DeliverySink for FnSink<F> {
    fn deliver(&mut self, msg: ChannelMessage) {
        (self.0)(msg);
    }
}
