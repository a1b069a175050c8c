use std::time::Duration;

use log::{error, info, warn};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};

use super::config::MqttConf;
use crate::record::InboundMessage;

/// Subscribes to the configured topic filter and hands published messages
/// to the pipeline one at a time.
pub struct MqttSource {
    client: AsyncClient,
    eventloop: rumqttc::EventLoop,
    topic_filter: String,
}

impl MqttSource {
    pub fn connect(conf: &MqttConf) -> Self {
        let mut options = MqttOptions::new(conf.client_id.clone(), conf.host.clone(), conf.port);
        options.set_keep_alive(Duration::from_secs(conf.keep_alive_secs));
        let (client, eventloop) = AsyncClient::new(options, 16);
        Self {
            client,
            eventloop,
            topic_filter: conf.topic_filter.clone(),
        }
    }

    /// Drive the connection until the next published message arrives.
    ///
    /// The subscription is (re)issued on every CONNACK, so it survives
    /// broker reconnects. Connection errors are logged and retried after a
    /// short pause; the client library owns the reconnect itself.
    pub async fn recv(&mut self) -> InboundMessage {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    info!(
                        "mqtt connected ({:?}); subscribing to {}",
                        ack.code, self.topic_filter
                    );
                    if let Err(e) = self
                        .client
                        .subscribe(self.topic_filter.clone(), QoS::AtMostOnce)
                        .await
                    {
                        error!("mqtt subscribe failed: {e}");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    return InboundMessage {
                        topic: publish.topic,
                        payload: publish.payload,
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("mqtt connection error: {e}");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }
}
