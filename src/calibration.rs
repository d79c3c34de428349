//! Calibration store: ADC counts to volts, TIA volts to amps.
//!
//! One store per reader, loaded at configuration time and read-only for the
//! rest of the run. Values live in atomics (f32 bit patterns) so a single
//! `static` store can be read from any task without locking.
//!
//! ```text
//! volts = counts * sd_adc_reference_volts / 2^adc_bits
//! amps  = volts / potentiostat_transimpedance_ohms
//! code  = volts * (2^qdac_bits - 1) / qdac_reference_volts
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::error::{ConfigError, EchemError};

/// Resolution of the sigma-delta readback ADC.
pub const SD_ADC_BITS: u8 = 16;

/// Resolution of the stimulus DAC.
pub const QDAC_BITS: u8 = 12;

/// Calibration constants for the analog front end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// Stimulus DAC reference voltage.
    pub qdac_reference_volts: f32,
    /// Sigma-delta ADC reference voltage.
    pub sd_adc_reference_volts: f32,
    /// Transimpedance amplifier feedback impedance.
    pub potentiostat_transimpedance_ohms: f32,
}

impl Calibration {
    /// Check that every value is finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.qdac_reference_volts,
            self.sd_adc_reference_volts,
            self.potentiostat_transimpedance_ohms,
        ];
        if values.iter().all(|v| v.is_finite() && *v > 0.0) {
            Ok(())
        } else {
            Err(ConfigError::InvalidCalibration)
        }
    }
}

/// Lock-free, load-once calibration holder.
pub struct CalibrationStore {
    loaded: AtomicBool,
    adc_bits: AtomicU8,
    qdac_ref: AtomicU32,
    adc_ref: AtomicU32,
    tia_ohms: AtomicU32,
}

impl CalibrationStore {
    /// Empty store using the default ADC resolution.
    pub const fn new() -> Self {
        Self::with_adc_bits(SD_ADC_BITS)
    }

    /// Empty store for an ADC with a different resolution.
    pub const fn with_adc_bits(adc_bits: u8) -> Self {
        Self {
            loaded: AtomicBool::new(false),
            adc_bits: AtomicU8::new(adc_bits),
            qdac_ref: AtomicU32::new(0),
            adc_ref: AtomicU32::new(0),
            tia_ohms: AtomicU32::new(0),
        }
    }

    /// Load calibration values.
    ///
    /// Called once while configuring the reader, before the acquisition
    /// loop starts. The loaded flag is published last.
    pub fn load(&self, calibration: &Calibration) -> Result<(), EchemError> {
        calibration.validate()?;

        self.qdac_ref
            .store(calibration.qdac_reference_volts.to_bits(), Ordering::Release);
        self.adc_ref
            .store(calibration.sd_adc_reference_volts.to_bits(), Ordering::Release);
        self.tia_ohms
            .store(calibration.potentiostat_transimpedance_ohms.to_bits(), Ordering::Release);
        self.loaded.store(true, Ordering::Release);

        log::info!(
            "calibration loaded: adc_ref={}V qdac_ref={}V tia={}ohm",
            calibration.sd_adc_reference_volts,
            calibration.qdac_reference_volts,
            calibration.potentiostat_transimpedance_ohms
        );
        Ok(())
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// ADC resolution used by [`to_volts`](Self::to_volts).
    #[inline]
    pub fn adc_bits(&self) -> u8 {
        self.adc_bits.load(Ordering::Relaxed)
    }

    /// Loaded calibration values.
    pub fn snapshot(&self) -> Result<Calibration, EchemError> {
        if !self.is_loaded() {
            return Err(EchemError::CalibrationNotLoaded);
        }
        Ok(Calibration {
            qdac_reference_volts: f32::from_bits(self.qdac_ref.load(Ordering::Acquire)),
            sd_adc_reference_volts: f32::from_bits(self.adc_ref.load(Ordering::Acquire)),
            potentiostat_transimpedance_ohms: f32::from_bits(self.tia_ohms.load(Ordering::Acquire)),
        })
    }

    /// Convert raw ADC counts to volts.
    #[inline]
    pub fn to_volts(&self, raw_counts: i32) -> Result<f32, EchemError> {
        if !self.is_loaded() {
            return Err(EchemError::CalibrationNotLoaded);
        }
        let reference = f32::from_bits(self.adc_ref.load(Ordering::Acquire));
        let full_scale = (1u64 << self.adc_bits().min(32)) as f32;
        Ok(raw_counts as f32 * reference / full_scale)
    }

    /// Convert the voltage across the TIA to cell current in amps.
    #[inline]
    pub fn to_current(&self, volts_across_tia: f32) -> Result<f32, EchemError> {
        if !self.is_loaded() {
            return Err(EchemError::CalibrationNotLoaded);
        }
        let ohms = f32::from_bits(self.tia_ohms.load(Ordering::Acquire));
        Ok(volts_across_tia / ohms)
    }

    /// Stimulus DAC code for `volts`, clamped to the DAC range.
    pub fn dac_code_for(&self, volts: f32) -> Result<u16, EchemError> {
        if !self.is_loaded() {
            return Err(EchemError::CalibrationNotLoaded);
        }
        let reference = f32::from_bits(self.qdac_ref.load(Ordering::Acquire));
        let max_code = ((1u32 << QDAC_BITS) - 1) as f32;
        let code = volts * max_code / reference;

        // `as` saturates and maps NaN to 0
        let clamped = if code > max_code { max_code } else { code };
        Ok((clamped + 0.5) as u16)
    }
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}
