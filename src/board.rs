use embassy_stm32::peripherals::{
    ADC1, EXTI12, EXTI13, EXTI14, EXTI15, EXTI6, EXTI7, EXTI8, PA11, PA12, PA8, PB12, PB13, PB14,
    PB15, PB4, PB5, PC1, PC13, PC4, PC6, PC7, TIM3, USB_OTG_FS,
};
use embassy_stm32::rcc::*;
use embassy_stm32::time::Hertz as TimeHertz;
use embassy_stm32::Config;

// ── Rig wiring ────────────────────────────────────────────────────────────────

/// Quadrature encoder on the yaw shaft plus the index sensor.
pub struct EncoderPins {
    pub channel_a: PC6,
    pub exti_a: EXTI6,
    pub channel_b: PC7,
    pub exti_b: EXTI7,
    /// Active low, once per revolution.
    pub reference: PC4,
}

/// Analog altitude sensor on ADC1 IN11.
pub struct HeightPins {
    pub adc: ADC1,
    pub sensor: PC1,
}

/// Main rotor on TIM3 CH1, tail rotor on TIM3 CH2.
pub struct RotorPins {
    pub timer: TIM3,
    pub main: PB4,
    pub tail: PB5,
}

/// Reference buttons (active low) and the takeoff slide switch.
pub struct InputPins {
    pub up: PB12,
    pub exti_up: EXTI12,
    pub down: PB13,
    pub exti_down: EXTI13,
    pub left: PB14,
    pub exti_left: EXTI14,
    pub right: PB15,
    pub exti_right: EXTI15,
    pub switch: PA8,
    pub exti_switch: EXTI8,
}

pub struct UsbPins {
    pub otg: USB_OTG_FS,
    pub dp: PA12,
    pub dm: PA11,
}

pub struct Board {
    pub encoder: EncoderPins,
    pub height: HeightPins,
    pub rotors: RotorPins,
    pub inputs: InputPins,
    pub usb: UsbPins,
    pub led: PC13,
}

impl Board {
    pub fn init() -> Self {
        let mut config = Config::default();
        config.rcc.hse = Some(Hse {
            freq: TimeHertz(8_000_000),
            mode: HseMode::Oscillator,
        });
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL168,
            divp: Some(PllPDiv::DIV2), // 168 MHz
            divq: Some(PllQDiv::DIV7), // 48 MHz for USB
            divr: None,
        });
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;

        let p = embassy_stm32::init(config);

        Self {
            encoder: EncoderPins {
                channel_a: p.PC6,
                exti_a: p.EXTI6,
                channel_b: p.PC7,
                exti_b: p.EXTI7,
                reference: p.PC4,
            },
            height: HeightPins {
                adc: p.ADC1,
                sensor: p.PC1,
            },
            rotors: RotorPins {
                timer: p.TIM3,
                main: p.PB4,
                tail: p.PB5,
            },
            inputs: InputPins {
                up: p.PB12,
                exti_up: p.EXTI12,
                down: p.PB13,
                exti_down: p.EXTI13,
                left: p.PB14,
                exti_left: p.EXTI14,
                right: p.PB15,
                exti_right: p.EXTI15,
                switch: p.PA8,
                exti_switch: p.EXTI8,
            },
            usb: UsbPins {
                otg: p.USB_OTG_FS,
                dp: p.PA12,
                dm: p.PA11,
            },
            led: p.PC13,
        }
    }
}
