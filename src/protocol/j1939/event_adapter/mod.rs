//! Bidirectional Event ⇄ J1939 translation.
//!
//! The adapter learns its source address from [`J1939Claim`] messages on the
//! bus and stays silent while that address is null. Outbound events become
//! 8-byte messages of `tx_pgn` sent to the address picked by
//! [`EventRouting::route`]. Inbound messages of `rx_pgn` addressed to us are
//! unpacked back into events.
//!
//! For a PDU1 `rx_pgn` the destination is the PDU specific byte. For a PDU2
//! `rx_pgn` (the default, `0xFF00`) the group extension carries the
//! destination: a frame is for us when its PGN equals `rx_pgn | address`.
//! A sender addressing this node therefore puts our address in the
//! group-extension byte: with the gateway at `0x20` it sends PGN `0xFF20`
//! (identifier `0x18FF20xx`). Other group extensions are ignored.
use crate::core::{
    DEFAULT_PRIORITY, EVENT_RX_PGN, EVENT_TX_PGN, EVENT_WIRE_LEN, NULL_ADDRESS,
};
use crate::protocol::bus::{Emit, Node};
use crate::protocol::message::{Event, J1939Claim, J1939Message, Message};
use crate::protocol::transport::can_id::is_pdu1;

//==================================================================================ROUTING
/// Per-ECU policy deciding which events cross the J1939 boundary.
///
/// Methods take `&mut self` so a policy may consult and update its own state
/// (last value sent, current page, ...).
pub trait EventRouting {
    /// Destination of an outbound event; `0xFF` broadcasts.
    fn route(&mut self, event: &Event) -> u8 {
        let _ = event;
        crate::core::BROADCAST_ADDRESS
    }

    /// `true` to send `event` on J1939.
    fn write_filter(&mut self, event: &Event) -> bool {
        let _ = event;
        true
    }

    /// `true` to publish a received `event` on the bus.
    fn read_filter(&mut self, event: &Event) -> bool {
        let _ = event;
        true
    }
}

/// Routing that lets every event through to the global address.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardAll;

impl EventRouting for ForwardAll {}

//==================================================================================CONFIG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventAdapterConfig {
    pub tx_pgn: u32,
    pub rx_pgn: u32,
    pub priority: u8,
    /// Only follow claims made with this NAME; `None` follows any gateway.
    pub bound_name: Option<u64>,
}

impl EventAdapterConfig {
    pub const fn new() -> Self {
        Self {
            tx_pgn: EVENT_TX_PGN,
            rx_pgn: EVENT_RX_PGN,
            priority: DEFAULT_PRIORITY,
            bound_name: None,
        }
    }

    pub const fn bound_to(mut self, name: u64) -> Self {
        self.bound_name = Some(name);
        self
    }
}

impl Default for EventAdapterConfig {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================ADAPTER
pub struct J1939EventAdapter<R = ForwardAll> {
    config: EventAdapterConfig,
    routing: R,
    source_address: u8,
}

impl J1939EventAdapter<ForwardAll> {
    pub fn new(config: EventAdapterConfig) -> Self {
        Self::with_routing(config, ForwardAll)
    }
}

impl<R: EventRouting> J1939EventAdapter<R> {
    pub fn with_routing(config: EventAdapterConfig, routing: R) -> Self {
        Self {
            config,
            routing,
            source_address: NULL_ADDRESS,
        }
    }

    /// Address learnt from the last matching claim.
    pub fn source_address(&self) -> u8 {
        self.source_address
    }

    pub fn routing(&mut self) -> &mut R {
        &mut self.routing
    }

    fn on_claim(&mut self, claim: &J1939Claim) {
        if self.config.bound_name.is_some_and(|name| name != claim.name) {
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("Event adapter source address {} -> {}", self.source_address, claim.address);
        self.source_address = claim.address;
    }

    fn on_event(&mut self, event: &Event, emit: &mut Emit<'_>) {
        if self.source_address == NULL_ADDRESS {
            #[cfg(feature = "defmt")]
            defmt::trace!("Event adapter has no address, dropping event");
            return;
        }
        if !self.routing.write_filter(event) {
            return;
        }
        let destination = self.routing.route(event);
        let message = J1939Message::new(self.config.tx_pgn, self.config.priority)
            .with_source(self.source_address)
            .with_destination(destination)
            .with_payload(&event.to_bytes());
        emit(&Message::j1939_message(message));
    }

    fn addressed_to_us(&self, message: &J1939Message) -> bool {
        let rx_pgn = self.config.rx_pgn;
        if is_pdu1(rx_pgn) {
            message.pgn == rx_pgn && message.destination == self.source_address
        } else {
            message.pgn == (rx_pgn | self.source_address as u32)
        }
    }

    fn on_message(&mut self, message: &J1939Message, emit: &mut Emit<'_>) {
        if self.source_address == NULL_ADDRESS
            || (message.len as usize) < EVENT_WIRE_LEN
            || !self.addressed_to_us(message)
        {
            return;
        }
        let event = Event::from_bytes(&message.data);
        if self.routing.read_filter(&event) {
            emit(&Message::event(event));
        }
    }
}

impl<R: EventRouting> Node for J1939EventAdapter<R> {
    fn handle(&mut self, message: &Message<'_>, emit: &mut Emit<'_>) {
        match message {
            Message::J1939Claim(claim) => self.on_claim(claim),
            Message::Event(event) => self.on_event(event, emit),
            Message::J1939Message(j1939) => self.on_message(j1939, emit),
            Message::Empty | Message::CanFrame(_) => {}
        }
    }
}
