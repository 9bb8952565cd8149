//! DIO driver tests against the LED board configuration.
//!
//! These tests run the driver on simulated ports; no hardware is needed.

use autosar_bsw::det::{DetRecorder, DetReport};
use autosar_bsw::port::{PortRegisters, SimPort};
use autosar_bsw::{
    board, ChannelGroup, ChannelId, Dio, DioConfig, DioFeatures, Error, Level, PortChannel,
    PortId, VersionInfo,
};

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
fn test_write_read_output_channels() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);

    for led in [board::LED1, board::LED2, board::LED3] {
        dio.write_channel(led, Level::High).unwrap();
        assert_eq!(dio.read_channel(led).unwrap(), Level::High);
        dio.write_channel(led, Level::Low).unwrap();
        assert_eq!(dio.read_channel(led).unwrap(), Level::Low);
    }

    dio.write_channel(board::LED2, Level::High).unwrap();
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0b0010_0000);
    assert_eq!(det.count(), 0);
}

#[test]
fn test_input_channel_follows_pin_not_writes() {
    init_logging();
    let button = ChannelId::new(PortId::F, 0);
    let config = DioConfig::new(
        vec![PortChannel::new(button, PortId::F)],
        vec![],
        DioFeatures::default(),
    )
    .unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, SimPort::bank(), &det);

    dio.write_channel(button, Level::High).unwrap();
    assert_eq!(dio.read_channel(button).unwrap(), Level::Low);

    dio.port(PortId::F).unwrap().drive_input(0x01, 0x01);
    assert_eq!(dio.read_channel(button).unwrap(), Level::High);
    dio.write_channel(button, Level::Low).unwrap();
    assert_eq!(dio.read_channel(button).unwrap(), Level::High);

    // Flip on an input changes nothing and reports the current level
    assert_eq!(dio.flip_channel(button).unwrap(), Level::High);
    assert_eq!(det.count(), 0);
}

#[test]
fn test_unknown_channel_is_reported_once() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);

    let bogus = ChannelId::from_raw(0xFF);
    assert_eq!(dio.read_channel(bogus).unwrap_or_default(), Level::Low);
    assert_eq!(det.reports(), vec![DetReport::new(120, 0, 0x00, 0x0A)]);

    // In range, but not in the table
    let unconfigured = ChannelId::new(PortId::B, 7);
    assert_eq!(
        dio.write_channel(unconfigured, Level::High),
        Err(Error::InvalidChannelId(unconfigured))
    );
    assert_eq!(det.last(), Some(DetReport::new(120, 0, 0x01, 0x0A)));
    assert_eq!(dio.port(PortId::B).unwrap().get_port(), 0x00);

    assert!(dio.flip_channel(bogus).is_err());
    assert_eq!(det.last(), Some(DetReport::new(120, 0, 0x11, 0x0A)));
    assert_eq!(det.count(), 3);
}

#[test]
fn test_write_port_keeps_input_pins() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    // Pin 7 is an input that reads high
    let dio = Dio::new(&config, board_ports(0x80), &det);

    dio.write_port(PortId::B, 0x00).unwrap();
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0x80);

    dio.write_port(PortId::B, 0x55).unwrap();
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0xD5);

    dio.write_port(PortId::B, 0x7F).unwrap();
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0xFF);
    assert_eq!(det.count(), 0);
}

#[test]
fn test_invalid_port() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);

    // Exists on the device but carries no configured channel
    assert_eq!(dio.read_port(PortId::A), Err(Error::InvalidPortId(PortId::A)));
    assert_eq!(det.last(), Some(DetReport::new(120, 0, 0x02, 0x14)));

    let port_g = PortId::from_raw(6);
    assert_eq!(dio.write_port(port_g, 0xFF), Err(Error::InvalidPortId(port_g)));
    assert_eq!(det.last(), Some(DetReport::new(120, 0, 0x03, 0x14)));
    assert_eq!(dio.read_port(port_g).unwrap_or_default(), 0);
    assert_eq!(det.count(), 3);
}

#[test]
fn test_flip_channel() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);

    assert_eq!(dio.flip_channel(board::LED1).unwrap(), Level::High);
    assert_eq!(dio.read_channel(board::LED1).unwrap(), Level::High);
    assert_eq!(dio.flip_channel(board::LED1).unwrap(), Level::Low);

    // Two flips leave the port as it was
    dio.write_port(PortId::B, 0x2A).unwrap();
    dio.flip_channel(board::LED3).unwrap();
    dio.flip_channel(board::LED3).unwrap();
    assert_eq!(dio.read_port(PortId::B).unwrap(), 0x2A);
    assert_eq!(det.count(), 0);
}

#[test]
fn test_version_info() {
    init_logging();
    let config = board::dio_config(DioFeatures::default()).unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);

    let mut info = VersionInfo::default();
    dio.get_version_info(Some(&mut info)).unwrap();
    assert_eq!(info.vendor_id, 0x40);
    assert_eq!(info.module_id, 120);
    assert_eq!(
        (info.sw_major_version, info.sw_minor_version, info.sw_patch_version),
        (1, 0, 0)
    );

    assert_eq!(dio.get_version_info(None), Err(Error::ParamPointer));
    assert_eq!(det.reports(), vec![DetReport::new(120, 0, 0x12, 0x20)]);
}

#[test]
fn test_detection_off_validates_silently() {
    init_logging();
    let config = board::dio_config(DioFeatures {
        dev_error_detect: false,
        ..DioFeatures::default()
    })
    .unwrap();
    let det = DetRecorder::new();
    let dio = Dio::new(&config, board_ports(0x00), &det);

    assert!(dio.read_channel(ChannelId::from_raw(0x60)).is_err());
    assert!(dio.read_port(PortId::C).is_err());
    let stray = ChannelGroup::new(0x01, 0, PortId::B);
    assert!(dio.write_channel_group(&stray, 0x01).is_err());
    assert_eq!(dio.port(PortId::B).unwrap().get_port(), 0x00);
    assert_eq!(det.count(), 0);
}
