//! Channel group tests: masking, alignment and group identity.

use autosar_bsw::det::{DetRecorder, DetReport};
use autosar_bsw::port::SimPort;
use autosar_bsw::{board, Dio, DioFeatures, Error, PortId};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn board_ports(port_b_data: u8) -> [SimPort; 6] {
    std::array::from_fn(|index| {
        if index == 1 {
            SimPort::with_state(board::PORT_B_DIRECTION, port_b_data)
        } else {
            SimPort::new()
        }
    })
}

#[test]
fn test_group_write_masks_and_shifts() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);
    let group = &dio.channel_groups()[board::GROUP_0];

    // 0b0100_0111 << 1 = 0x8E; mask 0xCE and outputs 0x7F leave 0x0E
    dio.write_channel_group(group, 0b0100_0111).unwrap();
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0x0E);
    assert_eq!(dio.read_channel_group(group).unwrap(), 0x07);
    assert_eq!(det.count(), 0);
}

#[test]
fn test_group_write_keeps_other_pins() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    // Pin 0 and 4 are outside group 1 (0x8E), pin 7 is an input
    let dio = Dio::new(&config, board_ports(0x91), &det);
    let group = config.group(board::GROUP_1).unwrap();

    dio.write_channel_group(group, 0x00).unwrap();
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0x91);

    dio.write_channel_group(group, 0xFF).unwrap();
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0x9F);
    // Pin 7 reads back through the group even though it is an input
    assert_eq!(dio.read_channel_group(group).unwrap(), 0x47);
    assert_eq!(det.count(), 0);
}

#[test]
fn test_group_round_trip() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);
    let group = &dio.channel_groups()[board::GROUP_0];

    // Pin 7 of the group is an input and always reads low here
    let writable = group.width_mask() & (board::PORT_B_DIRECTION >> group.offset);
    assert_eq!(writable, 0b0010_0111);
    for value in [0x00, 0x01, 0x05, 0x20, 0x27, 0x67] {
        dio.write_channel_group(group, value).unwrap();
        assert_eq!(dio.read_channel_group(group).unwrap(), value & writable);
    }
}

#[test]
fn test_copied_group_is_rejected() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);

    // Same value as table entry 0, different object
    let copy = board::CHANNEL_GROUPS[board::GROUP_0];
    assert_eq!(copy, dio.channel_groups()[board::GROUP_0]);

    assert_eq!(
        dio.write_channel_group(&copy, 0xFF),
        Err(Error::InvalidGroup {
            mask: 0xCE,
            offset: 1
        })
    );
    assert_eq!(det.last(), Some(DetReport::new(120, 0, 0x05, 0x1F)));
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0x00);

    assert_eq!(dio.read_channel_group(&copy).unwrap_or_default(), 0);
    assert_eq!(det.last(), Some(DetReport::new(120, 0, 0x04, 0x1F)));
    assert_eq!(det.count(), 2);
}
