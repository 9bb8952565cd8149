use autosar_bsw::{
    board,
    det::LogReporter,
    port::SimPort,
    CanIf, CanIfFeatures, ChannelId, Dio, DioFeatures, Level, NotifStatus, PortId, Result,
};
use std::{thread, time::Duration};

// Runs the LED board configuration on simulated ports.
// Use RUST_LOG=trace to see every register access.
fn main() -> Result<()> {
    env_logger::init();

    let dio_config = board::dio_config(DioFeatures::default())?;
    let ports = SimPort::bank();
    ports[1].set_direction(board::PORT_B_DIRECTION);
    let det = LogReporter;
    let dio = Dio::new(&dio_config, ports, &det);

    println!("Running LED chaser on port B...");
    for led in [board::LED1, board::LED2, board::LED3] {
        dio.write_channel(led, Level::High)?;
        println!("  {:02X}: port B = 0x{:02X}", led, dio.read_port(PortId::B)?);
        thread::sleep(Duration::from_millis(100));
        dio.write_channel(led, Level::Low)?;
    }

    println!("Blinking LED1 with flip_channel...");
    for _ in 0..4 {
        let level = dio.flip_channel(board::LED1)?;
        println!("  LED1 is now {:?}", level);
        thread::sleep(Duration::from_millis(100));
    }

    let group = &dio.channel_groups()[board::GROUP_0];
    dio.write_channel_group(group, 0b0100_0111)?;
    println!(
        "Group 0 (mask 0x{:02X}): wrote 0x47, reads 0x{:02X}, port B = 0x{:02X}",
        group.mask,
        dio.read_channel_group(group)?,
        dio.read_port(PortId::B)?
    );

    // Development errors are logged by the DET and the call fails
    match dio.read_channel(ChannelId::from_raw(0x77)) {
        Ok(level) => println!("Unexpected level {:?}", level),
        Err(e) => println!("Channel 0x77 rejected: {}", e),
    }

    let canif_config = board::canif_config()?;
    let mut canif = CanIf::new(CanIfFeatures::default(), &det);
    canif.init(&canif_config);

    println!("Simulating a transmit confirmation for the LED status frame...");
    println!(
        "  CAN ID {}",
        canif.tx_pdu_can_id(board::TX_LED_STATUS)?
    );
    canif.tx_confirmation(board::TX_LED_STATUS)?;
    for _ in 0..2 {
        let status = canif.read_tx_notif_status(board::TX_LED_STATUS)?;
        println!("  Notification status: {:?}", status);
    }

    canif.set_dynamic_tx_id(board::TX_LED_STATUS, 0x321)?;
    println!(
        "  CAN ID after set_dynamic_tx_id: {}",
        canif.tx_pdu_can_id(board::TX_LED_STATUS)?
    );

    canif.rx_indication(board::RX_LED_COMMAND)?;
    if canif.read_rx_notif_status(board::RX_LED_COMMAND)? == NotifStatus::TxRxNotification {
        println!("LED command received, switching all LEDs on");
        dio.write_port(PortId::B, 0x70)?;
        println!("  port B = 0x{:02X}", dio.read_port(PortId::B)?);
    }

    Ok(())
}
