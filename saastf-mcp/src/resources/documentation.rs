pub const DOCUMENTATION: &str = r"# saas.tf Subdomains

saas.tf hands out subdomains of `saas.tf` (for example `myapp.saas.tf`) and
provisions a DNS A record for each one. Records go live within about a minute.

## Plans

| Plan       | Subdomains | Price     |
|------------|------------|-----------|
| FREE       | 2          | free      |
| PACKAGE_5  | 7          | $10/year  |
| PACKAGE_50 | 52         | $50/year  |

Paid packages add to the two free subdomains. Upgrade with
`saastf_create_checkout` and complete payment at the returned URL; the quota
updates on its own afterwards.

## Naming rules

- 3 to 63 characters
- lowercase letters, digits and hyphens
- first and last character must be a letter or digit
- no `--`

Accepted: `myapp`, `demo-project`, `staging-api`, `test123`
Rejected: `my`, `MyApp`, `demo--project`, `-test`, `api-`

Only IPv4 addresses can be targeted.

## Getting started

1. `saastf_register` with an email and a password (8+ characters, at least one
   letter and one digit), or `saastf_login` for an existing account.
2. `saastf_check_availability` to see whether a name is free. Taken names come
   back with alternatives.
3. `saastf_create_subdomain` with the name and the IPv4 address to point at.
4. `saastf_list_subdomains` to see what you own and how much quota is left.

## Tools

Account
- `saastf_auth_status`: who is signed in, with quota
- `saastf_register`, `saastf_login`, `saastf_logout`

Subdomains
- `saastf_check_availability`
- `saastf_list_subdomains`
- `saastf_create_subdomain`
- `saastf_update_subdomain`: point an existing subdomain at a new IP
- `saastf_delete_subdomain`: frees one slot of quota

Billing
- `saastf_get_quota`
- `saastf_get_plans`
- `saastf_get_subscription`
- `saastf_create_checkout`

## Resources

- `saastf://documentation`: this guide
- `saastf://user/profile`: account, subscription and quota as JSON
- `saastf://user/subdomains`: subdomains with quota and counts as JSON

## Credentials

After login the session credential is kept in the operating system keychain.
Where no keychain is available it is written to an encrypted file under
`~/.saastf-mcp/` that only the current user can read. Logging out removes it
from both places. Expired sessions are dropped automatically, and you will be
asked to log in again.

## Troubleshooting

- **Authentication required**: log in again, the session has expired or was
  revoked.
- **Subdomain limit reached**: delete a subdomain or upgrade the plan.
- **Name already taken**: try one of the suggested alternatives.
- **Network error**: check connectivity; set `SAASTF_API_URL` if you are using
  a different API endpoint.
";
