// IAM policy documents for the execution role.

use serde_json::json;

/// AWS-managed policy granting CloudWatch Logs access.
pub const LAMBDA_BASIC_EXECUTION_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

/// Trust policy allowing the Lambda service to assume the execution role.
pub fn trust_policy() -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": "lambda.amazonaws.com" },
            "Action": "sts:AssumeRole"
        }]
    })
    .to_string()
}

/// Inline policy granting invoke access to Bedrock models, including the
/// streaming variant.
pub fn bedrock_invoke_policy() -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Action": [
                "bedrock:InvokeModel",
                "bedrock:InvokeModelWithResponseStream"
            ],
            "Resource": "*"
        }]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn trust_policy_names_lambda_service() {
        let doc: Value = serde_json::from_str(&trust_policy()).unwrap();
        assert_eq!(doc["Version"], "2012-10-17");
        assert_eq!(
            doc["Statement"][0]["Principal"]["Service"],
            "lambda.amazonaws.com"
        );
        assert_eq!(doc["Statement"][0]["Action"], "sts:AssumeRole");
    }

    #[test]
    fn invoke_policy_covers_both_invoke_actions() {
        let doc: Value = serde_json::from_str(&bedrock_invoke_policy()).unwrap();
        let actions = doc["Statement"][0]["Action"].as_array().unwrap();
        assert!(actions.contains(&Value::from("bedrock:InvokeModel")));
        assert!(actions.contains(&Value::from("bedrock:InvokeModelWithResponseStream")));
    }
}
