//! J1939 gateway: address claim and destination filtering over a CAN
//! connection.
//!
//! A gateway configured with a NAME sends a claim for its preferred address at
//! `init`, then listens for [`ADDRESS_CLAIM_TIMEOUT_MS`]. The address is taken
//! once that window closes without a lost contention; the check runs on each
//! `emit`. Claimants with a higher or equal NAME are answered with our claim.
//! On a loss the gateway walks to the next address if its NAME is
//! arbitrary-address capable, and the window starts over. Every change of
//! its own address is published as a [`J1939Claim`] so event adapters learn
//! the address without knowing the gateway; until then outbound traffic is
//! dropped. A gateway without a NAME works at a fixed address and never
//! negotiates.
//!
//! Inbound frames are published as [`J1939Message`]s when `promiscuous`, or
//! addressed to us, or broadcast. Claims and claim requests are processed
//! first, then forwarded under the same rule. Outbound bus messages are written
//! only when their source is our current address (any source when
//! `promiscuous`).
use crate::core::{ADDRESS_CLAIM_TIMEOUT_MS, NULL_ADDRESS};
use crate::error::ConnectionError;
use crate::protocol::bus::{Emit, Node};
use crate::protocol::j1939::address_claim::{
    address_claim_message, is_claim_request, next_address, parse_address_claim,
};
use crate::protocol::j1939::iso_name::IsoName;
use crate::protocol::message::{CanFrame, J1939Claim, J1939Message, Message};
use crate::protocol::transport::traits::clock::Clock;
use crate::protocol::transport::traits::connection::{Connection, LogErrors, TransportHooks};
use crate::protocol::transport::READ_BUDGET;

/// Addresses tried before giving up: every claimable one.
const MAX_CLAIM_ATTEMPTS: u8 = 254;

//==================================================================================CONFIG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GatewayConfig {
    pub preferred_address: u8,
    /// Raw NAME; `0` selects fixed-address mode.
    pub name: u64,
    /// Forward every frame in both directions regardless of addressing.
    pub promiscuous: bool,
}

impl GatewayConfig {
    /// Negotiate `preferred_address` with `name`.
    pub const fn claiming(preferred_address: u8, name: IsoName) -> Self {
        Self {
            preferred_address,
            name: name.raw(),
            promiscuous: false,
        }
    }

    /// Work at `address` without claiming.
    pub const fn fixed(address: u8) -> Self {
        Self {
            preferred_address: address,
            name: 0,
            promiscuous: false,
        }
    }

    pub const fn promiscuous(mut self, promiscuous: bool) -> Self {
        self.promiscuous = promiscuous;
        self
    }

    /// `true` when a NAME is configured.
    pub const fn is_claiming(&self) -> bool {
        self.name != 0
    }
}

//==================================================================================STATE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClaimState {
    /// Preferred address known, claim not sent yet.
    Unclaimed,
    /// Claim sent at `since_ms`; listening for contention.
    Pending { address: u8, since_ms: u64 },
    /// Operating at this address.
    Claimed(u8),
    /// Lost arbitration everywhere; the gateway cannot transmit.
    Failed,
}

impl ClaimState {
    /// Address usable for traffic, [`NULL_ADDRESS`] unless claimed.
    pub fn address(&self) -> u8 {
        match self {
            ClaimState::Claimed(address) => *address,
            _ => NULL_ADDRESS,
        }
    }

    /// Address claimed or being claimed.
    pub fn held(&self) -> Option<u8> {
        match self {
            ClaimState::Pending { address, .. } | ClaimState::Claimed(address) => Some(*address),
            ClaimState::Unclaimed | ClaimState::Failed => None,
        }
    }
}

//==================================================================================GATEWAY
pub struct J1939Gateway<C, K, H = LogErrors>
where
    C: Connection<Frame = CanFrame>,
    K: Clock,
    H: TransportHooks<CanFrame, C::Error>,
{
    connection: C,
    clock: K,
    hooks: H,
    config: GatewayConfig,
    state: ClaimState,
    attempts: u8,
}

impl<C, K> J1939Gateway<C, K, LogErrors>
where
    C: Connection<Frame = CanFrame>,
    K: Clock,
{
    pub fn new(connection: C, clock: K, config: GatewayConfig) -> Self {
        Self::with_hooks(connection, clock, config, LogErrors)
    }
}

impl<C, K, H> J1939Gateway<C, K, H>
where
    C: Connection<Frame = CanFrame>,
    K: Clock,
    H: TransportHooks<CanFrame, C::Error>,
{
    pub fn with_hooks(connection: C, clock: K, config: GatewayConfig, hooks: H) -> Self {
        let state = if config.is_claiming() {
            ClaimState::Unclaimed
        } else {
            ClaimState::Claimed(config.preferred_address)
        };
        Self {
            connection,
            clock,
            hooks,
            config,
            state,
            attempts: 0,
        }
    }

    /// Current address, [`NULL_ADDRESS`] unless claimed.
    pub fn address(&self) -> u8 {
        self.state.address()
    }

    pub fn state(&self) -> ClaimState {
        self.state
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    fn announce(&self, emit: &mut Emit<'_>) {
        emit(&Message::j1939_claim(J1939Claim::new(
            self.address(),
            self.config.name,
        )));
    }

    fn send_claim(&mut self, address: u8) {
        self.send(&address_claim_message(self.config.name, address));
    }

    fn send(&mut self, message: &J1939Message) {
        let frame = match message.to_can() {
            Ok(frame) => frame,
            Err(_error) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("J1939 message not encodable: {}", defmt::Debug2Format(&_error));
                return;
            }
        };
        if let Err(error) = self.connection.write(&frame) {
            self.hooks.on_write_error(&error, &frame);
        }
    }

    /// Send our claim for `address` and open the contention window.
    fn claim(&mut self, address: u8) {
        #[cfg(feature = "defmt")]
        defmt::info!("J1939 claiming address {}", address);
        self.state = ClaimState::Pending {
            address,
            since_ms: self.clock.now_ms(),
        };
        self.send_claim(address);
    }

    /// Take the pending address once its window closed uncontested.
    fn confirm(&mut self, emit: &mut Emit<'_>) {
        let ClaimState::Pending { address, since_ms } = self.state else {
            return;
        };
        if self.clock.now_ms().wrapping_sub(since_ms) < ADDRESS_CLAIM_TIMEOUT_MS {
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("J1939 address {} claimed", address);
        self.state = ClaimState::Claimed(address);
        self.announce(emit);
    }

    fn fail(&mut self, emit: &mut Emit<'_>) {
        #[cfg(feature = "defmt")]
        defmt::warn!("J1939 address claim failed, gateway is now silent");
        self.state = ClaimState::Failed;
        self.announce(emit);
    }

    /// Contention on our address by `their_name`.
    fn on_claim(&mut self, source: u8, their_name: u64, emit: &mut Emit<'_>) {
        let Some(current) = self.state.held() else {
            return;
        };
        if source != current {
            return;
        }

        let ours = IsoName::from_raw(self.config.name);
        if ours.wins_against(&IsoName::from_raw(their_name)) {
            #[cfg(feature = "defmt")]
            defmt::debug!("J1939 defending address {}", current);
            self.send_claim(current);
            if let ClaimState::Claimed(_) = self.state {
                self.announce(emit);
            }
            return;
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("J1939 lost address {} to NAME {=u64:#X}", current, their_name);
        if !ours.is_arbitrary_address_capable() {
            self.fail(emit);
            return;
        }

        let next = next_address(current);
        self.attempts = self.attempts.saturating_add(1);
        if next == self.config.preferred_address || self.attempts >= MAX_CLAIM_ATTEMPTS {
            self.fail(emit);
        } else {
            self.claim(next);
        }
    }

    fn should_forward(&self, message: &J1939Message) -> bool {
        self.config.promiscuous
            || message.is_broadcast()
            || message.destination == self.address()
    }

    fn process(&mut self, frame: &CanFrame, emit: &mut Emit<'_>) {
        let Some(message) = J1939Message::from_can(frame) else {
            return;
        };

        if self.config.is_claiming() {
            if let Some((source, name)) = parse_address_claim(&message) {
                self.on_claim(source, name, emit);
            } else if let Some(address) = self.state.held() {
                if is_claim_request(&message, address) {
                    self.send_claim(address);
                }
            }
        }

        if self.should_forward(&message) {
            emit(&Message::j1939_message_view(&message));
        }
    }
}

impl<C, K, H> Node for J1939Gateway<C, K, H>
where
    C: Connection<Frame = CanFrame>,
    K: Clock,
    H: TransportHooks<CanFrame, C::Error>,
{
    fn init(&mut self, emit: &mut Emit<'_>) {
        self.attempts = 0;
        if self.config.is_claiming() {
            self.claim(self.config.preferred_address);
        } else {
            self.announce(emit);
        }
    }

    fn handle(&mut self, message: &Message<'_>, _emit: &mut Emit<'_>) {
        let Some(message) = message.as_j1939_message() else {
            return;
        };
        let address = self.address();
        let allowed = self.config.promiscuous
            || (address != NULL_ADDRESS && message.source == address);
        if allowed {
            self.send(message);
        } else {
            #[cfg(feature = "defmt")]
            defmt::trace!("J1939 dropping message from {} (we are {})", message.source, address);
        }
    }

    fn emit(&mut self, emit: &mut Emit<'_>) {
        for _ in 0..READ_BUDGET {
            match self.connection.read() {
                Ok(frame) => self.process(&frame, emit),
                Err(ConnectionError::FifoEmpty) => break,
                Err(error) => {
                    self.hooks.on_read_error(&error);
                    break;
                }
            }
        }
        self.confirm(emit);
    }
}
