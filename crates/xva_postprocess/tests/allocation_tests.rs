mod common;

use approx::assert_relative_eq;
use common::*;
use xva_core::types::Currency;
use xva_postprocess::portfolio::{NettingSet, NettingSetId, PortfolioBuilder, Trade, TradeId};
use xva_postprocess::{AllocationMethod, Analytic, PostProcess, PostProcessConfig};

const TRADES: [&str; 3] = ["T1", "T2", "T3"];

fn run(method: AllocationMethod, marginal_limit: f64) -> PostProcess {
    let portfolio = PortfolioBuilder::new()
        .add_netting_set(NettingSet::new("NS".into(), "CPTY_A".into()))
        .add_trades(
            TRADES
                .iter()
                .map(|id| Trade::new((*id).into(), "NS".into(), date(2030, 1, 1))),
        )
        .build()
        .unwrap();
    let cube = cube(
        quarterly_dates(2),
        3,
        &[
            ("T1", 2.0, vec![vec![5.0, -1.0, 2.0], vec![3.0, 0.0, -4.0]]),
            ("T2", -6.0, vec![vec![-2.0, 4.0, 1.0], vec![6.0, -2.0, 1.0]]),
            ("T3", 1.0, vec![vec![1.0, -3.0, 0.5], vec![-1.0, 2.0, 0.0]]),
        ],
    );
    let mut config = PostProcessConfig::new(Currency::USD)
        .with_analytic(Analytic::Cva, true)
        .with_analytic(Analytic::Dva, true)
        .with_allocation_method(method);
    config.dva_name = Some("BANK".to_string());
    config.marginal_allocation_limit = marginal_limit;
    PostProcess::new(&portfolio, &market(), &cube, &unit_numeraire(2, 3), config).unwrap()
}

fn allocated_sum(pp: &PostProcess, f: impl Fn(&PostProcess, &TradeId) -> f64) -> f64 {
    TRADES.iter().map(|id| f(pp, &TradeId::new(*id))).sum()
}

#[test]
fn test_marginal_allocation_is_additive() {
    let pp = run(AllocationMethod::Marginal, 0.0);
    let ns = NettingSetId::new("NS");
    let xva = pp.netting_set_xva(&ns).unwrap();

    assert_relative_eq!(
        allocated_sum(&pp, |pp, id| pp.allocated_trade_cva(id).unwrap()),
        xva.cva,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        allocated_sum(&pp, |pp, id| pp.allocated_trade_dva(id).unwrap()),
        xva.dva,
        epsilon = 1e-12
    );

    let epe = pp.netting_set_epe(&ns).unwrap();
    for k in 0..epe.len() {
        let sum: f64 = TRADES
            .iter()
            .map(|id| pp.allocated(&TradeId::new(*id)).unwrap().epe[k])
            .sum();
        assert_relative_eq!(sum, epe[k], epsilon = 1e-12);
    }
}

#[test]
fn test_marginal_limit_gives_equal_shares() {
    let pp = run(AllocationMethod::Marginal, 1e6);
    let ns = NettingSetId::new("NS");
    let epe = pp.netting_set_epe(&ns).unwrap();
    let ene = pp.netting_set_ene(&ns).unwrap();
    for id in TRADES {
        let allocated = pp.allocated(&TradeId::new(id)).unwrap();
        for k in 0..epe.len() {
            assert_relative_eq!(allocated.epe[k], epe[k] / 3.0, epsilon = 1e-12);
            assert_relative_eq!(allocated.ene[k], ene[k] / 3.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_relative_fair_value_gross_weights() {
    let pp = run(AllocationMethod::RelativeFairValueGross, 0.0);
    let cva = pp.netting_set_cva(&NettingSetId::new("NS")).unwrap();
    // |2| : |-6| : |1|
    assert_relative_eq!(pp.allocated_trade_cva(&"T1".into()).unwrap(), cva * 2.0 / 9.0, epsilon = 1e-12);
    assert_relative_eq!(pp.allocated_trade_cva(&"T2".into()).unwrap(), cva * 6.0 / 9.0, epsilon = 1e-12);
    assert_relative_eq!(pp.allocated_trade_cva(&"T3".into()).unwrap(), cva / 9.0, epsilon = 1e-12);
}

#[test]
fn test_relative_fair_value_net_weights_can_be_negative() {
    let pp = run(AllocationMethod::RelativeFairValueNet, 0.0);
    let dva = pp.netting_set_dva(&NettingSetId::new("NS")).unwrap();
    // 2 / -3, -6 / -3, 1 / -3
    assert_relative_eq!(pp.allocated_trade_dva(&"T1".into()).unwrap(), -dva * 2.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(pp.allocated_trade_dva(&"T2".into()).unwrap(), dva * 2.0, epsilon = 1e-12);
    assert_relative_eq!(
        allocated_sum(&pp, |pp, id| pp.allocated_trade_dva(id).unwrap()),
        dva,
        epsilon = 1e-12
    );
}

#[test]
fn test_relative_xva_uses_stand_alone_cva() {
    let pp = run(AllocationMethod::RelativeXva, 0.0);
    let cva = pp.netting_set_cva(&NettingSetId::new("NS")).unwrap();
    let stand_alone: f64 = allocated_sum(&pp, |pp, id| pp.trade_xva(id).unwrap().cva);
    for id in TRADES {
        let id = TradeId::new(id);
        let expected = cva * pp.trade_xva(&id).unwrap().cva / stand_alone;
        assert_relative_eq!(pp.allocated_trade_cva(&id).unwrap(), expected, epsilon = 1e-12);
    }
}

#[test]
fn test_no_allocation_reports_zero() {
    let pp = run(AllocationMethod::None, 0.0);
    for id in TRADES {
        let allocated = pp.allocated(&TradeId::new(id)).unwrap();
        assert_eq!(allocated.cva, 0.0);
        assert!(allocated.epe.iter().all(|e| *e == 0.0));
    }
    assert!(pp.netting_set_cva(&NettingSetId::new("NS")).unwrap() > 0.0);
}
