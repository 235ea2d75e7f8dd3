use api_subs::checkout::WIDGET_SCRIPT_URL;
use api_subs::comparison::format_currency;
use api_subs::{PaymentWidget, ProviderEvent, WidgetOptions};
use async_trait::async_trait;
use colored::Colorize;
use common::error::Res;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Checkout for terminals: prints the widget options for a browser
/// session and reads the provider's outcome back from stdin.
pub struct TerminalWidget;

#[async_trait]
impl PaymentWidget for TerminalWidget {
    async fn open(&self, options: &WidgetOptions) -> Res<ProviderEvent> {
        println!("{}", options.description.bold());
        println!(
            "  Amount:   {}",
            format_currency(options.amount as f64 / 100.0, &options.currency)
        );
        println!("  Order:    {}", options.order_id);
        println!("  Widget:   {}", WIDGET_SCRIPT_URL);
        println!("  Options:  {}", serde_json::to_string(options)?);
        println!();
        println!("Complete the payment, then enter one of:");
        println!("  <payment_id> <order_id> <signature>   payment succeeded");
        println!("  fail <reason>                         payment failed");
        println!("  (empty line)                          cancel");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let line = lines.next_line().await?.unwrap_or_default();
        Ok(parse_event(&line))
    }
}

/// Parses the outcome line entered after checkout.
pub fn parse_event(line: &str) -> ProviderEvent {
    let line = line.trim();
    if line.is_empty() {
        return ProviderEvent::Dismissed;
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    if word == "fail" {
        let reason = rest.trim();
        return ProviderEvent::Failed {
            description: if reason.is_empty() {
                "Payment failed".to_string()
            } else {
                reason.to_string()
            },
            payment_id: None,
        };
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [payment_id, order_id, signature] => ProviderEvent::Succeeded {
            payment_id: payment_id.to_string(),
            order_id: order_id.to_string(),
            signature: signature.to_string(),
        },
        _ => ProviderEvent::Failed {
            description: format!("Unrecognised payment result: {}", line),
            payment_id: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes() {
        assert_eq!(parse_event("  "), ProviderEvent::Dismissed);
        assert_eq!(
            parse_event("pay_1 order_9 sig"),
            ProviderEvent::Succeeded {
                payment_id: "pay_1".into(),
                order_id: "order_9".into(),
                signature: "sig".into(),
            }
        );
        assert_eq!(
            parse_event("fail card declined"),
            ProviderEvent::Failed {
                description: "card declined".into(),
                payment_id: None,
            }
        );
        assert!(matches!(parse_event("pay_1 order_9"), ProviderEvent::Failed { .. }));
    }

    #[test]
    fn fail_must_be_a_whole_word() {
        assert_eq!(
            parse_event("failover_pay order_9 sig"),
            ProviderEvent::Succeeded {
                payment_id: "failover_pay".into(),
                order_id: "order_9".into(),
                signature: "sig".into(),
            }
        );
        assert_eq!(
            parse_event("fail"),
            ProviderEvent::Failed {
                description: "Payment failed".into(),
                payment_id: None,
            }
        );
    }
}
