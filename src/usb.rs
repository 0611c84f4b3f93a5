use embassy_stm32::usb_otg::{self, Driver};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use crate::board::UsbPins;

bind_interrupts!(struct Irqs {
    OTG_FS => usb_otg::InterruptHandler<peripherals::USB_OTG_FS>;
});

pub type UsbDriver = Driver<'static, peripherals::USB_OTG_FS>;
pub type UsbSerial = CdcAcmClass<'static, UsbDriver>;

/// The text console. Every task that prints goes through this lock.
pub type Console = Mutex<CriticalSectionRawMutex, UsbSerial>;

const PACKET_SIZE: usize = 64;

struct Buffers {
    config_desc: [u8; 256],
    bos_desc: [u8; 256],
    control_buf: [u8; 64],
    ep_out: [u8; 256],
}

static BUFFERS: StaticCell<Buffers> = StaticCell::new();
static CDC_STATE: StaticCell<State<'static>> = StaticCell::new();
static CONSOLE: StaticCell<Console> = StaticCell::new();

#[embassy_executor::task]
pub async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// Bring up USB CDC-ACM. Call once.
pub fn init(pins: UsbPins) -> (UsbDevice<'static, UsbDriver>, &'static Console) {
    let buffers = BUFFERS.init(Buffers {
        config_desc: [0; 256],
        bos_desc: [0; 256],
        control_buf: [0; 64],
        ep_out: [0; 256],
    });

    let mut usb_config = usb_otg::Config::default();
    usb_config.vbus_detection = false;
    let driver = Driver::new_fs(pins.otg, Irqs, pins.dp, pins.dm, &mut buffers.ep_out, usb_config);

    let mut config = Config::new(0xc0de, 0xcafe);
    config.manufacturer = Some("Heli Rig");
    config.product = Some("Heli Rig Controller");
    config.serial_number = Some("00000001");

    let mut builder = Builder::new(
        driver,
        config,
        &mut buffers.config_desc,
        &mut buffers.bos_desc,
        &mut [], // msos_descs
        &mut buffers.control_buf,
    );

    let state = CDC_STATE.init(State::new());
    let class = CdcAcmClass::new(&mut builder, state, PACKET_SIZE as u16);
    let device = builder.build();

    (device, CONSOLE.init(Mutex::new(class)))
}

/// Write `bytes` in packet-sized chunks. Dropped if no terminal is attached.
pub async fn write_chunked(console: &Console, bytes: &[u8]) {
    let mut serial = console.lock().await;
    if !serial.dtr() {
        return;
    }
    for chunk in bytes.chunks(PACKET_SIZE) {
        let _ = serial.write_packet(chunk).await;
    }
}
