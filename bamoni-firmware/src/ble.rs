use bamoni_cycle::{Transport, WakeCycleController};
use bamoni_fmt::{debug, info, unwrap};
use bamoni_frame::{AdError, BeaconAd, Frame};
use bt_hci::cmd::SyncCmd;
use embassy_futures::join::join;
use embassy_nrf::{mode, pac, peripherals, rng};
use embassy_time::{Delay, Duration};
use nrf_mpsl::MultiprotocolServiceLayer;
use nrf_sdc::{SoftdeviceController, vendor::ZephyrWriteBdAddr};
use trouble_host::prelude::*;

use crate::{
    adc::BatterySensor,
    clock::UptimeClock,
    constants::{
        BAMONI_AD_LEN, BAMONI_BLE_TX_POWER, BAMONI_MAX_ADV_INTERVAL_MS, BAMONI_MIN_ADV_INTERVAL_MS,
        BAMONI_NAME, BEACON_CONFIG,
    },
    power::TimerSleep,
    retained,
};

#[embassy_executor::task]
pub async fn mpsl_task(mpsl: &'static MultiprotocolServiceLayer<'static>) -> ! {
    mpsl.run().await
}

pub fn build_sdc<'d, const N: usize>(
    p: nrf_sdc::Peripherals<'d>,
    rng: &'d mut rng::Rng<peripherals::RNG, mode::Async>,
    mpsl: &'d MultiprotocolServiceLayer,
    mem: &'d mut nrf_sdc::Mem<N>,
) -> Result<SoftdeviceController<'d>, nrf_sdc::Error> {
    nrf_sdc::Builder::new()?
        .support_adv()?
        .support_ext_adv()?
        .support_le_coded_phy()?
        .adv_count(1)?
        .adv_buffer_cfg(BAMONI_AD_LEN as u16)?
        .build(p, rng, mpsl, mem)
}

fn build_addr() -> BdAddr {
    let ficr = pac::FICR;
    let high = u64::from(ficr.deviceid(1).read());
    let addr = high << 32 | u64::from(ficr.deviceid(0).read());
    let addr = addr | 0x0000_c000_0000_0000;
    BdAddr::new(unwrap!(addr.to_le_bytes()[..6].try_into()))
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeaconError {
    Ad(AdError),
    Host(BleHostError<bt_hci::param::Error>),
}

impl From<AdError> for BeaconError {
    fn from(value: AdError) -> Self {
        Self::Ad(value)
    }
}

impl From<BleHostError<bt_hci::param::Error>> for BeaconError {
    fn from(value: BleHostError<bt_hci::param::Error>) -> Self {
        Self::Host(value)
    }
}

/// Non-connectable extended advertising on the coded PHY, carrying the frame as manufacturer data.
pub struct BleBeacon<'d> {
    peripheral: Peripheral<'d, SoftdeviceController<'d>, DefaultPacketPool>,
    advertiser: Option<Advertiser<'d, SoftdeviceController<'d>>>,
    params: AdvertisementParameters,
}

impl<'d> BleBeacon<'d> {
    pub fn new(peripheral: Peripheral<'d, SoftdeviceController<'d>, DefaultPacketPool>) -> Self {
        let params = AdvertisementParameters {
            primary_phy: PhyKind::LeCoded,
            secondary_phy: PhyKind::LeCoded,
            interval_min: Duration::from_millis(BAMONI_MIN_ADV_INTERVAL_MS),
            interval_max: Duration::from_millis(BAMONI_MAX_ADV_INTERVAL_MS),
            tx_power: BAMONI_BLE_TX_POWER,
            ..Default::default()
        };

        Self {
            peripheral,
            advertiser: None,
            params,
        }
    }
}

impl Transport for BleBeacon<'_> {
    type Error = BeaconError;

    async fn start(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        let mut ad = BeaconAd::<BAMONI_AD_LEN>::default();

        ad.add_manufacturer_data(frame.as_bytes())
            .and_then(|ad| ad.add_local_name(BAMONI_NAME))?;

        let sets = [AdvertisementSet {
            params: self.params,
            data: Advertisement::ExtNonconnectableNonscannableUndirected {
                anonymous: false,
                adv_data: ad.encode(),
            },
        }];
        let mut handles = AdvertisementSet::handles(&sets);

        info!("Starting advertising");
        let advertiser = self.peripheral.advertise_ext(&sets, &mut handles).await?;

        self.advertiser = Some(advertiser);

        Ok(())
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        // Dropping the advertiser disables the set.
        if self.advertiser.take().is_some() {
            info!("Stopping advertising");
        }

        Ok(())
    }
}

pub async fn run<'d>(controller: SoftdeviceController<'d>, sensor: BatterySensor) {
    let addr = build_addr();

    info!("Our address = {:?}", &addr);

    // Set the bluetooth address
    unwrap!(ZephyrWriteBdAddr::new(addr).exec(&controller).await);

    let mut resources: HostResources<DefaultPacketPool, 0, 0> = HostResources::new();
    let stack = trouble_host::new(controller, &mut resources);
    let Host {
        peripheral,
        mut runner,
        ..
    } = stack.build();

    let mut store = unwrap!(retained::take(), "Retained region already taken");
    let mut beacon = WakeCycleController::new(
        BEACON_CONFIG,
        sensor,
        UptimeClock::new(),
        BleBeacon::new(peripheral),
        Delay,
        TimerSleep,
    );

    let _ = join(runner.run(), async {
        loop {
            let report = beacon.run_cycle(&mut store).await;

            debug!("Cycle finished: {}", report);
        }
    })
    .await;
}
