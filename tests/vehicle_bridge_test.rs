//! End-to-end wiring of a vehicle integration module: a RealDash dashboard on
//! a serial link, a J1939 accessory network, a raw body CAN bus and a
//! heartbeat, all on one bus.
mod helpers {
    include!("helpers/mod.rs");
}

use canbridge::core::{ADDRESS_CLAIM_TIMEOUT_MS, EVENT_RX_PGN};
use canbridge::protocol::bus::Bus;
use canbridge::protocol::can::{CanNode, StaticIdFilter};
use canbridge::protocol::events::{subsystem, IpdmState, NodeAlive};
use canbridge::protocol::heartbeat::Heartbeat;
use canbridge::protocol::j1939::{EventAdapterConfig, GatewayConfig, J1939EventAdapter, J1939Gateway};
use canbridge::protocol::message::{CanFrame, Event, J1939Message, Message};
use canbridge::protocol::transport::nextion::{encode_fmt, NextionReader};
use canbridge::protocol::transport::realdash::{
    RealDashConfig, RealDashFrame, RealDashNode, RealDashParser, REALDASH_EVENT_FRAME_ID,
};
use helpers::{MockClock, MockConnection, Recorder};

const NAME: u64 = 0x8000_0000_0000_2000;
const BODY_IDS: &[u32] = &[0x2A0];

fn serial_frames(bytes: Vec<u8>) -> Vec<RealDashFrame> {
    let mut parser = RealDashParser::new();
    bytes.into_iter().filter_map(|byte| parser.push(byte)).collect()
}

#[test]
fn test_dashboard_and_accessory_network_exchange_events() {
    let serial = MockConnection::<u8>::new();
    let j1939 = MockConnection::<CanFrame>::new();
    let body = MockConnection::<CanFrame>::new();
    let clock = MockClock::at(10_000);

    let mut dashboard = RealDashNode::new(
        serial.clone(),
        RealDashConfig {
            forward_can: true,
            ..RealDashConfig::default()
        },
    );
    let mut gateway = J1939Gateway::new(j1939.clone(), &clock, GatewayConfig::claiming(0x20, NAME.into()));
    let mut adapter = J1939EventAdapter::new(EventAdapterConfig::new().bound_to(NAME));
    let filter = StaticIdFilter::allow_all().reading(BODY_IDS).writing(&[]);
    let mut body_can = CanNode::with_policy(body.clone(), filter);
    let mut alive = NodeAlive::new();
    alive.set_node(0x20);
    let mut heartbeat = Heartbeat::new(&clock, alive.into_event(), 1_000);
    let mut monitor = Recorder::new();
    let tap = monitor.tap();

    let mut bus: Bus<'_, 6> = Bus::new([
        &mut dashboard,
        &mut gateway,
        &mut adapter,
        &mut body_can,
        &mut heartbeat,
        &mut monitor,
    ]);
    bus.init();
    j1939.take_written();

    // First cycle after the claim window: the gateway takes 0x20, then only
    // the heartbeat speaks; it reaches the dashboard and the accessory network.
    clock.advance(ADDRESS_CLAIM_TIMEOUT_MS);
    bus.poll();
    let frames = serial_frames(serial.take_written());
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].id, REALDASH_EVENT_FRAME_ID);
    assert!(NodeAlive::try_from(frames[0].to_event()).is_ok());
    assert_eq!(j1939.take_written().len(), 1);
    tap.take();

    // Dashboard toggles the fog lamps: the event crosses to J1939.
    let mut fog = IpdmState::new();
    fog.set_fog_lamps(true);
    let command = RealDashFrame::from_event(REALDASH_EVENT_FRAME_ID, fog.event());
    serial.feed_all(command.encode());
    bus.poll();
    let written = j1939.take_written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].id, 0x18EF_FF20);
    assert_eq!(written[0].payload(), &fog.event().to_bytes());
    assert_eq!(tap.take(), vec![Message::event(*fog.event()), Message::j1939_message(J1939Message::from_can(&written[0]).unwrap())]);

    // An accessory reports its state back to us: the dashboard gets it.
    let reply = Event::with_data(subsystem::POWER, IpdmState::ID, [0x09, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    let inbound = J1939Message::new(EVENT_RX_PGN | 0x20, 6)
        .with_source(0x40)
        .with_payload(&reply.to_bytes());
    j1939.feed(inbound.to_can().unwrap());
    bus.poll();
    let frames = serial_frames(serial.take_written());
    assert_eq!(frames.len(), 1);
    let state = IpdmState::try_from(frames[0].to_event()).unwrap();
    assert!(state.fog_lamps());
    assert!(state.high_beams());

    // Raw body CAN: allowed ids reach the dashboard as CAN frames, others do not.
    body.feed_all([CanFrame::standard(0x2A0, &[1, 2, 3]), CanFrame::standard(0x2A1, &[4])]);
    bus.poll();
    let frames = serial_frames(serial.take_written());
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].id, 0x2A0);
    assert_eq!(frames[0].to_can(), CanFrame::standard(0x2A0, &[1, 2, 3, 0, 0, 0, 0, 0]));
    // The body bus is read-only for this module.
    assert!(body.take_written().is_empty());

    // Next heartbeat once the period has elapsed.
    clock.advance(1_000);
    bus.poll();
    assert_eq!(serial_frames(serial.take_written()).len(), 1);
    assert_eq!(bus.dropped(), 0);
}

#[test]
/// Garbage and corrupted frames on the serial link are skipped.
fn test_dashboard_resynchronises_on_noise() {
    let serial = MockConnection::<u8>::new();
    let mut dashboard = RealDashNode::new(serial.clone(), RealDashConfig::default());
    let mut monitor = Recorder::new();
    let tap = monitor.tap();

    let event = Event::new(subsystem::KEYPAD, 0x01);
    let good = RealDashFrame::from_event(REALDASH_EVENT_FRAME_ID, &event).encode();
    let mut corrupted = good;
    corrupted[10] ^= 0x55;

    serial.feed_all([0x00, 0x44, 0x12]);
    serial.feed_all(corrupted);
    serial.feed_all(good);
    {
        let mut bus: Bus<'_, 2> = Bus::new([&mut dashboard, &mut monitor]);
        bus.poll();
    }
    assert_eq!(tap.take(), vec![Message::event(event)]);
    assert_eq!(dashboard.rejected(), 1);
}

#[test]
fn test_display_commands_and_responses() {
    let command = encode_fmt::<32>(format_args!("t0.txt=\"{}\"", 21)).unwrap();
    assert_eq!(command.as_slice(), b"t0.txt=\"21\"\xFF\xFF\xFF");

    let mut reader: NextionReader<8> = NextionReader::new();
    let mut responses = Vec::new();
    for byte in [0x65, 0x00, 0x02, 0x01, 0xFF, 0xFF, 0xFF, 0x1A, 0xFF, 0xFF, 0xFF] {
        if let Some(response) = reader.push(byte) {
            responses.push(response.to_vec());
        }
    }
    assert_eq!(responses, vec![vec![0x65, 0x00, 0x02, 0x01], vec![0x1A]]);
}
